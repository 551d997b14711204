/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Suppliers of [`ProfileFile`]s
//!
//! A [`ProfileFileSupplier`] decides when a profile file is (re)read:
//! - [`ProfileFileSupplier::fixed`] and [`ProfileFileSupplier::fixed_path`] produce one file and
//!   return it forever.
//! - [`ProfileFileSupplier::reload_when_modified`] checks the modification time of the file on
//!   every [`get`](ProfileFileSupplier::get) and reparses it only when the file changed.
//! - [`ProfileFileSupplier::aggregate`] merges the output of several suppliers.
//!
//! Nothing happens in the background: files are only checked when `get` is called.

use crate::profile::error::ProfileFileError;
use crate::profile::profile_file::{ProfileFile, ProfileFileKind};
use crate::profile::source;
use aws_types::os_shim_internal::{Env, Fs, TimeSource};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Modification time changes at or below this threshold do not trigger a reload
///
/// File systems with coarse timestamps, or several writes in quick succession, can produce
/// modification times that differ only slightly.
pub const MODIFICATION_TIME_JITTER: Duration = Duration::from_millis(100);

/// Supplies [`ProfileFile`]s according to a caching policy
///
/// Suppliers are cheap to clone; clones share their cache. `get` may be called from several
/// threads at once.
///
/// # Examples
/// ```rust
/// use aws_config::profile::{ProfileFileKind, ProfileFileSupplier};
/// use aws_types::os_shim_internal::Fs;
/// use std::collections::HashMap;
///
/// let fs = Fs::from_map(HashMap::from([(
///     "/home/.aws/config".to_string(),
///     "[profile foo]\nregion = us-east-1",
/// )]));
/// let supplier = ProfileFileSupplier::reloading("/home/.aws/config", ProfileFileKind::Config)
///     .fs(fs)
///     .build();
/// let file = supplier.get().unwrap().unwrap();
/// assert_eq!(file.profile("foo").unwrap().get("region"), Some("us-east-1"));
/// ```
#[derive(Clone, Debug)]
pub struct ProfileFileSupplier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
enum Inner {
    Fixed(Option<ProfileFile>),
    FixedPath {
        source: FileSource,
        file: OnceCell<ProfileFile>,
    },
    Reloading {
        source: FileSource,
        time_source: TimeSource,
        cache: Mutex<Option<CachedFile>>,
    },
    Aggregate {
        suppliers: Vec<ProfileFileSupplier>,
        cache: Mutex<Option<CachedAggregate>>,
    },
}

/// Last successful load of a reloading supplier
///
/// The fields are only ever replaced together.
#[derive(Debug)]
struct CachedFile {
    file: ProfileFile,
    /// `None` when the file did not exist at load time
    modified: Option<SystemTime>,
    loaded_at: SystemTime,
}

#[derive(Debug)]
struct CachedAggregate {
    constituents: Vec<ProfileFile>,
    file: ProfileFile,
}

type LoadListener = dyn Fn(&ProfileFile) + Send + Sync;

#[derive(Clone)]
struct OnLoad(Arc<LoadListener>);

impl Debug for OnLoad {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("OnLoad")
    }
}

#[derive(Debug)]
struct FileSource {
    fs: Fs,
    path: PathBuf,
    kind: ProfileFileKind,
    on_load: Option<OnLoad>,
}

impl FileSource {
    fn load(&self) -> Result<ProfileFile, ProfileFileError> {
        ProfileFile::load(&self.fs, &self.path, self.kind)
    }

    /// Current modification time of the file, `None` if it does not exist
    fn modified(&self) -> Result<Option<SystemTime>, ProfileFileError> {
        match self.fs.modified(&self.path) {
            Ok(modified) => Ok(Some(modified)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ProfileFileError::could_not_read(
                Some(self.path.as_path()),
                err,
            )),
        }
    }

    fn notify(&self, file: &ProfileFile) {
        if let Some(OnLoad(on_load)) = &self.on_load {
            on_load(file);
        }
    }
}

/// True if a file observed at `current` should replace one loaded at `previous`
fn is_modified(current: Option<SystemTime>, previous: Option<SystemTime>) -> bool {
    match (current, previous) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(current), Some(previous)) => current
            .duration_since(previous)
            .map(|delta| delta > MODIFICATION_TIME_JITTER)
            .unwrap_or(false),
    }
}

impl ProfileFileSupplier {
    fn from_inner(inner: Inner) -> Self {
        ProfileFileSupplier {
            inner: Arc::new(inner),
        }
    }

    /// Supplier that always returns `file`
    ///
    /// `None` is accepted: the supplier then always returns `None`.
    pub fn fixed(file: impl Into<Option<ProfileFile>>) -> Self {
        Self::from_inner(Inner::Fixed(file.into()))
    }

    /// Supplier that loads the file at `path` on the first `get` and never again
    ///
    /// A failed first load is not remembered; the next `get` tries again.
    pub fn fixed_path(fs: Fs, path: impl Into<PathBuf>, kind: ProfileFileKind) -> Self {
        Self::reloading(path, kind).fs(fs).build_fixed()
    }

    /// Supplier that reloads the file at `path` whenever its modification time moves forward
    ///
    /// Uses the real file system and clock; see [`ProfileFileSupplier::reloading`] to configure
    /// them.
    pub fn reload_when_modified(path: impl Into<PathBuf>, kind: ProfileFileKind) -> Self {
        Self::reloading(path, kind).build()
    }

    /// Builder for a supplier of the file at `path`
    pub fn reloading(path: impl Into<PathBuf>, kind: ProfileFileKind) -> Builder {
        Builder::new(path, kind)
    }

    /// Supplier merging the files of `suppliers`, in order
    ///
    /// Suppliers later in the list take precedence (see [`ProfileFile::aggregate`]). Suppliers
    /// that return `None` are skipped. The merged file is rebuilt only when one of the
    /// constituent files changed.
    pub fn aggregate(suppliers: impl IntoIterator<Item = ProfileFileSupplier>) -> Self {
        Self::from_inner(Inner::Aggregate {
            suppliers: suppliers.into_iter().collect(),
            cache: Mutex::new(None),
        })
    }

    /// Reloading supplier for the default credentials and config files
    ///
    /// File locations are resolved with [`source::location`]. Config file values take precedence
    /// over credentials file values.
    pub fn default_supplier(fs: Fs, env: &Env, time_source: TimeSource) -> Self {
        let supplier = |kind| {
            Self::reloading(source::location(kind, env), kind)
                .fs(fs.clone())
                .time_source(time_source.clone())
                .build()
        };
        Self::aggregate([
            supplier(ProfileFileKind::Credentials),
            supplier(ProfileFileKind::Config),
        ])
    }

    /// The current profile file
    ///
    /// Errors from loading the file are returned as is. A reloading supplier keeps its previous
    /// file when a reload fails and tries again on the next call.
    pub fn get(&self) -> Result<Option<ProfileFile>, ProfileFileError> {
        match self.inner.as_ref() {
            Inner::Fixed(file) => Ok(file.clone()),
            Inner::FixedPath { source, file } => {
                let mut loaded = false;
                let file = file.get_or_try_init(|| {
                    loaded = true;
                    source.load()
                })?;
                if loaded {
                    source.notify(file);
                }
                Ok(Some(file.clone()))
            }
            Inner::Reloading {
                source,
                time_source,
                cache,
            } => get_reloading(source, time_source, cache).map(Some),
            Inner::Aggregate { suppliers, cache } => get_aggregate(suppliers, cache),
        }
    }
}

fn get_reloading(
    source: &FileSource,
    time_source: &TimeSource,
    cache: &Mutex<Option<CachedFile>>,
) -> Result<ProfileFile, ProfileFileError> {
    let mut cache = cache.lock();
    let modified = source.modified()?;
    if let Some(cached) = cache.as_ref() {
        if !is_modified(modified, cached.modified) {
            tracing::trace!(path = %source.path.display(), "profile file unchanged");
            return Ok(cached.file.clone());
        }
        tracing::debug!(
            path = %source.path.display(),
            since_last_load = ?time_source.now().duration_since(cached.loaded_at).ok(),
            "profile file was modified; reloading"
        );
    }
    let file = source.load()?;
    *cache = Some(CachedFile {
        file: file.clone(),
        modified,
        loaded_at: time_source.now(),
    });
    source.notify(&file);
    Ok(file)
}

fn get_aggregate(
    suppliers: &[ProfileFileSupplier],
    cache: &Mutex<Option<CachedAggregate>>,
) -> Result<Option<ProfileFile>, ProfileFileError> {
    let mut cache = cache.lock();
    let mut constituents = Vec::with_capacity(suppliers.len());
    for supplier in suppliers {
        if let Some(file) = supplier.get()? {
            constituents.push(file);
        }
    }
    if constituents.is_empty() {
        return Ok(None);
    }
    if let Some(cached) = cache.as_ref() {
        let unchanged = cached.constituents.len() == constituents.len()
            && cached
                .constituents
                .iter()
                .zip(&constituents)
                .all(|(a, b)| ProfileFile::ptr_eq(a, b));
        if unchanged {
            return Ok(Some(cached.file.clone()));
        }
    }
    let file = ProfileFile::aggregate(&constituents);
    *cache = Some(CachedAggregate {
        constituents,
        file: file.clone(),
    });
    Ok(Some(file))
}

/// Builder for path based [`ProfileFileSupplier`]s
///
/// Defaults to the real file system and clock.
#[derive(Debug)]
pub struct Builder {
    path: PathBuf,
    kind: ProfileFileKind,
    fs: Fs,
    time_source: TimeSource,
    on_load: Option<OnLoad>,
}

impl Builder {
    fn new(path: impl Into<PathBuf>, kind: ProfileFileKind) -> Self {
        Builder {
            path: path.into(),
            kind,
            fs: Fs::default(),
            time_source: TimeSource::default(),
            on_load: None,
        }
    }

    pub fn fs(mut self, fs: Fs) -> Self {
        self.fs = fs;
        self
    }

    pub fn set_fs(&mut self, fs: Fs) -> &mut Self {
        self.fs = fs;
        self
    }

    pub fn time_source(mut self, time_source: TimeSource) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn set_time_source(&mut self, time_source: TimeSource) -> &mut Self {
        self.time_source = time_source;
        self
    }

    /// Invoke `on_load` with every successfully (re)loaded file
    ///
    /// The listener runs on the thread calling `get`, while the supplier's cache is locked. It
    /// must not call `get` on the same supplier.
    pub fn on_load(mut self, on_load: impl Fn(&ProfileFile) + Send + Sync + 'static) -> Self {
        self.on_load = Some(OnLoad(Arc::new(on_load)));
        self
    }

    fn source(self) -> (FileSource, TimeSource) {
        (
            FileSource {
                fs: self.fs,
                path: self.path,
                kind: self.kind,
                on_load: self.on_load,
            },
            self.time_source,
        )
    }

    /// Supplier that reloads the file when it is modified
    pub fn build(self) -> ProfileFileSupplier {
        let (source, time_source) = self.source();
        ProfileFileSupplier::from_inner(Inner::Reloading {
            source,
            time_source,
            cache: Mutex::new(None),
        })
    }

    /// Supplier that loads the file once
    pub fn build_fixed(self) -> ProfileFileSupplier {
        let (source, _) = self.source();
        ProfileFileSupplier::from_inner(Inner::FixedPath {
            source,
            file: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{is_modified, ProfileFileSupplier, MODIFICATION_TIME_JITTER};
    use crate::profile::error::ProfileFileError;
    use crate::profile::profile_file::{ProfileFile, ProfileFileKind};
    use aws_types::os_shim_internal::{Env, Fs, ManualTimeSource, TimeSource};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tracing_test::traced_test;

    const PATH: &str = "/home/.aws/credentials";

    fn credentials(access_key: &str) -> String {
        format!(
            "[default]\naws_access_key_id = {}\naws_secret_access_key = defaultSecretAccessKey",
            access_key
        )
    }

    fn access_key(file: &ProfileFile) -> Option<&str> {
        file.profile("default")?.get("aws_access_key_id")
    }

    struct TestEnv {
        fs: Fs,
        clock: ManualTimeSource,
    }

    impl TestEnv {
        fn new() -> Self {
            let env = TestEnv {
                fs: Fs::from_map(HashMap::<String, Vec<u8>>::new()),
                clock: ManualTimeSource::new(UNIX_EPOCH + Duration::from_secs(1_600_000_000)),
            };
            env.write(&credentials("defaultAccessKey"), Duration::ZERO);
            env
        }

        /// Write the credentials file with a modification time of `clock + offset`
        fn write(&self, contents: &str, offset: Duration) {
            self.fs
                .write(PATH, contents, self.clock.now() + offset)
                .expect("fake fs writes succeed");
        }

        fn reloading(&self) -> ProfileFileSupplier {
            ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials)
                .fs(self.fs.clone())
                .time_source(TimeSource::manual(&self.clock))
                .build()
        }
    }

    fn get(supplier: &ProfileFileSupplier) -> ProfileFile {
        supplier
            .get()
            .expect("file loads")
            .expect("supplier has a file")
    }

    #[test]
    fn modification_threshold() {
        let t = SystemTime::now();
        assert!(!is_modified(None, None));
        assert!(!is_modified(None, Some(t)));
        assert!(is_modified(Some(t), None));
        assert!(!is_modified(Some(t), Some(t)));
        assert!(!is_modified(Some(t + MODIFICATION_TIME_JITTER), Some(t)));
        assert!(is_modified(
            Some(t + MODIFICATION_TIME_JITTER + Duration::from_millis(1)),
            Some(t)
        ));
        assert!(!is_modified(Some(t), Some(t + Duration::from_secs(10))));
    }

    #[test]
    fn fixed_supplier_returns_the_same_file() {
        let file = ProfileFile::parse(&credentials("a"), ProfileFileKind::Credentials)
            .expect("valid file");
        let supplier = ProfileFileSupplier::fixed(file.clone());
        assert!(ProfileFile::ptr_eq(&get(&supplier), &file));
        assert!(ProfileFile::ptr_eq(&get(&supplier), &file));
    }

    #[test]
    fn fixed_supplier_of_nothing() {
        let supplier = ProfileFileSupplier::fixed(None);
        assert!(supplier.get().expect("no load").is_none());
        assert!(supplier.get().expect("no load").is_none());
    }

    #[test]
    fn fixed_path_loads_once() {
        let env = TestEnv::new();
        let supplier =
            ProfileFileSupplier::fixed_path(env.fs.clone(), PATH, ProfileFileKind::Credentials);
        let first = get(&supplier);
        env.write(&credentials("modifiedAccessKey"), Duration::from_secs(60));
        env.clock.advance(Duration::from_secs(120));
        let second = get(&supplier);
        assert!(ProfileFile::ptr_eq(&first, &second));
        assert_eq!(access_key(&second), Some("defaultAccessKey"));
    }

    #[test]
    fn fixed_path_retries_failed_loads() {
        let env = TestEnv::new();
        env.write("[default", Duration::ZERO);
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let supplier = ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials)
            .fs(env.fs.clone())
            .on_load(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build_fixed();
        assert!(matches!(
            supplier.get(),
            Err(ProfileFileError::CouldNotParseProfile(_))
        ));
        env.write(&credentials("fixedAccessKey"), Duration::ZERO);
        assert_eq!(access_key(&get(&supplier)), Some("fixedAccessKey"));
        get(&supplier);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn small_modification_does_not_reload() {
        let env = TestEnv::new();
        let supplier = env.reloading();
        let first = get(&supplier);
        env.write(&credentials("modifiedAccessKey"), Duration::from_millis(10));
        env.clock.advance(Duration::from_millis(10));
        let second = get(&supplier);
        assert!(ProfileFile::ptr_eq(&first, &second));
        assert_eq!(access_key(&second), Some("defaultAccessKey"));
    }

    #[test]
    fn modification_reloads() {
        let env = TestEnv::new();
        let supplier = env.reloading();
        assert_eq!(access_key(&get(&supplier)), Some("defaultAccessKey"));

        env.write(&credentials("modifiedAccessKey"), Duration::from_secs(1));
        env.clock.advance(Duration::from_secs(10));
        assert_eq!(access_key(&get(&supplier)), Some("modifiedAccessKey"));
    }

    #[test]
    fn one_reload_per_modification() {
        let env = TestEnv::new();
        let supplier = env.reloading();
        let first = get(&supplier);
        env.write(&credentials("modifiedAccessKey"), Duration::from_secs(1));
        env.clock.advance(Duration::from_secs(10));
        let reloaded = get(&supplier);
        assert!(!ProfileFile::ptr_eq(&first, &reloaded));
        for _ in 0..5 {
            assert!(ProfileFile::ptr_eq(&reloaded, &get(&supplier)));
        }
    }

    #[test]
    fn listener_sees_every_load() {
        let env = TestEnv::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let listener_seen = seen.clone();
        let supplier = ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials)
            .fs(env.fs.clone())
            .time_source(TimeSource::manual(&env.clock))
            .on_load(move |file| {
                listener_seen
                    .lock()
                    .push(access_key(file).map(str::to_string))
            })
            .build();

        get(&supplier);
        for i in 1..=3 {
            env.clock.advance(Duration::from_secs(10));
            env.write(&credentials(&format!("key{}", i)), Duration::ZERO);
            get(&supplier);
            get(&supplier);
            env.write(&credentials("ignored"), Duration::from_millis(5));
            get(&supplier);
        }
        assert_eq!(
            *seen.lock(),
            vec![
                Some("defaultAccessKey".to_string()),
                Some("key1".to_string()),
                Some("key2".to_string()),
                Some("key3".to_string()),
            ]
        );
    }

    #[test]
    fn missing_file_is_empty_until_it_appears() {
        let fs = Fs::from_map(HashMap::<String, Vec<u8>>::new());
        let clock = ManualTimeSource::new(UNIX_EPOCH);
        let supplier = ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials)
            .fs(fs.clone())
            .time_source(TimeSource::manual(&clock))
            .build();
        let empty = get(&supplier);
        assert!(empty.is_empty());
        assert!(ProfileFile::ptr_eq(&empty, &get(&supplier)));

        fs.write(PATH, credentials("newAccessKey"), clock.now())
            .expect("fake fs writes succeed");
        assert_eq!(access_key(&get(&supplier)), Some("newAccessKey"));
    }

    #[test]
    #[traced_test]
    fn failed_reload_keeps_previous_file() {
        let env = TestEnv::new();
        let supplier = env.reloading();
        let first = get(&supplier);

        env.write("[default]\n= no name", Duration::from_secs(1));
        let err = supplier.get().expect_err("broken file");
        assert!(
            format!("{}", err).contains("Property did not have a name"),
            "unexpected error: {}",
            err
        );
        assert!(logs_contain("profile file was modified; reloading"));

        // still broken: the reload is attempted again rather than serving stale data
        assert!(supplier.get().is_err());

        env.write(&credentials("repairedAccessKey"), Duration::from_secs(2));
        let repaired = get(&supplier);
        assert!(!ProfileFile::ptr_eq(&first, &repaired));
        assert_eq!(access_key(&repaired), Some("repairedAccessKey"));
    }

    #[test]
    fn concurrent_callers_converge_on_one_reload() {
        let env = TestEnv::new();
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let supplier = ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials)
            .fs(env.fs.clone())
            .time_source(TimeSource::manual(&env.clock))
            .on_load(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        get(&supplier);
        env.write(&credentials("modifiedAccessKey"), Duration::from_secs(1));

        let files: Vec<ProfileFile> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let supplier = supplier.clone();
                    s.spawn(move || get(&supplier))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread did not panic"))
                .collect()
        });
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        for file in &files {
            assert!(ProfileFile::ptr_eq(file, &files[0]));
            assert_eq!(access_key(file), Some("modifiedAccessKey"));
        }
    }

    #[test]
    fn aggregate_supplier_rebuilds_only_on_change() {
        let env = TestEnv::new();
        env.fs
            .write(
                "/home/.aws/config",
                "[profile other]\nregion = us-west-2\n[default]\naws_access_key_id = fromConfig",
                env.clock.now(),
            )
            .expect("fake fs writes succeed");
        let config = ProfileFileSupplier::reloading("/home/.aws/config", ProfileFileKind::Config)
            .fs(env.fs.clone())
            .time_source(TimeSource::manual(&env.clock))
            .build();
        let supplier = ProfileFileSupplier::aggregate([
            env.reloading(),
            ProfileFileSupplier::fixed(None),
            config,
        ]);

        let first = get(&supplier);
        assert_eq!(access_key(&first), Some("fromConfig"));
        let default = first.profile("default").expect("default profile");
        assert_eq!(
            default.get("aws_secret_access_key"),
            Some("defaultSecretAccessKey")
        );
        assert_eq!(first.kind(), None);
        assert!(ProfileFile::ptr_eq(&first, &get(&supplier)));

        env.write(
            "[default]\naws_secret_access_key = rotated",
            Duration::from_secs(1),
        );
        let second = get(&supplier);
        assert!(!ProfileFile::ptr_eq(&first, &second));
        let default = second.profile("default").expect("default profile");
        assert_eq!(default.get("aws_secret_access_key"), Some("rotated"));
    }

    #[test]
    fn aggregate_of_nothing() {
        let supplier = ProfileFileSupplier::aggregate([ProfileFileSupplier::fixed(None)]);
        assert!(supplier.get().expect("no load").is_none());
    }

    #[test]
    fn reloads_from_real_file_system() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("credentials");
        let fs = Fs::real();
        let start = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs.write(&path, credentials("defaultAccessKey"), start)
            .expect("write credentials");
        let supplier = ProfileFileSupplier::reloading(&path, ProfileFileKind::Credentials)
            .fs(fs.clone())
            .build();
        assert_eq!(access_key(&get(&supplier)), Some("defaultAccessKey"));

        fs.write(
            &path,
            credentials("modifiedAccessKey"),
            start + Duration::from_secs(5),
        )
        .expect("write credentials");
        assert_eq!(access_key(&get(&supplier)), Some("modifiedAccessKey"));
    }

    #[test]
    fn deleted_file_keeps_cached_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("credentials");
        let fs = Fs::real();
        fs.write(&path, credentials("defaultAccessKey"), SystemTime::now())
            .expect("write credentials");
        let supplier = ProfileFileSupplier::reloading(&path, ProfileFileKind::Credentials)
            .fs(fs)
            .build();
        let first = get(&supplier);

        std::fs::remove_file(&path).expect("remove credentials");
        let second = get(&supplier);
        assert!(ProfileFile::ptr_eq(&first, &second));
        assert_eq!(access_key(&second), Some("defaultAccessKey"));
    }

    #[test]
    fn builder_setters() {
        let env = TestEnv::new();
        let mut builder = ProfileFileSupplier::reloading(PATH, ProfileFileKind::Credentials);
        builder
            .set_fs(env.fs.clone())
            .set_time_source(TimeSource::manual(&env.clock));
        let supplier = builder.build();
        let first = get(&supplier);
        assert_eq!(access_key(&first), Some("defaultAccessKey"));

        env.write(&credentials("modifiedAccessKey"), Duration::from_secs(1));
        assert_eq!(access_key(&get(&supplier)), Some("modifiedAccessKey"));
    }

    #[test]
    fn default_supplier_reads_both_files() {
        let fs = Fs::from_map(HashMap::from([
            (
                "/home/.aws/config".to_string(),
                "[profile foo]\nregion = us-east-1",
            ),
            (
                "/custom/credentials".to_string(),
                "[foo]\naws_access_key_id = AKID",
            ),
        ]));
        let env = Env::from_slice(&[
            ("HOME", "/home"),
            ("AWS_SHARED_CREDENTIALS_FILE", "/custom/credentials"),
        ]);
        let supplier = ProfileFileSupplier::default_supplier(fs, &env, TimeSource::real());
        let file = get(&supplier);
        let foo = file.profile("foo").expect("merged profile");
        assert_eq!(foo.get("region"), Some("us-east-1"));
        assert_eq!(foo.get("aws_access_key_id"), Some("AKID"));
    }
}
