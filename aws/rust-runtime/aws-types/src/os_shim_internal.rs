/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Abstractions for testing code that interacts with the operating system:
//! - Reading files and their modification times
//! - Reading environment variables
//! - Reading the current time
//!
//! Each shim has a `real()` variant backed by the OS and one or more fake variants that tests
//! can control directly.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::env::VarError;
use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// File system abstraction
///
/// Simple abstraction enabling in-memory mocking of the file system
///
/// # Examples
/// Construct a file system which delegates to `std::fs`:
/// ```rust
/// let fs = aws_types::os_shim_internal::Fs::real();
/// ```
///
/// Construct an in-memory file system for testing:
/// ```rust
/// use std::collections::HashMap;
/// let fs = aws_types::os_shim_internal::Fs::from_map({
///     let mut map = HashMap::new();
///     map.insert("/home/.aws/config".to_string(), "[default]\nregion = us-east-1");
///     map
/// });
/// ```
#[derive(Clone, Debug)]
pub struct Fs(FsInner);

impl Default for Fs {
    fn default() -> Self {
        Fs::real()
    }
}

#[derive(Clone, Debug)]
enum FsInner {
    Real,
    Fake(Arc<Mutex<HashMap<OsString, FakeFile>>>),
    Namespaced(NamespacedFs),
}

#[derive(Clone, Debug)]
struct FakeFile {
    contents: Vec<u8>,
    modified: SystemTime,
}

/// Maps paths under `namespaced_to` onto a directory of the real file system
#[derive(Clone, Debug)]
struct NamespacedFs {
    real_path: PathBuf,
    namespaced_to: PathBuf,
}

impl NamespacedFs {
    fn map(&self, path: &Path) -> io::Result<PathBuf> {
        let relative = path.strip_prefix(&self.namespaced_to).map_err(|_| {
            io::Error::new(
                ErrorKind::NotFound,
                format!(
                    "{} is outside of the namespaced directory {}",
                    path.display(),
                    self.namespaced_to.display()
                ),
            )
        })?;
        Ok(self.real_path.join(relative))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

fn write_real(path: &Path, contents: &[u8], modified: SystemTime) -> io::Result<()> {
    std::fs::write(path, contents)?;
    let file = std::fs::OpenOptions::new().write(true).open(path)?;
    file.set_modified(modified)
}

impl Fs {
    pub fn real() -> Self {
        Fs(FsInner::Real)
    }

    /// Create an in-memory file system. Every file starts with a modification time of the
    /// Unix epoch.
    pub fn from_raw_map(fs: HashMap<OsString, Vec<u8>>) -> Self {
        let files = fs
            .into_iter()
            .map(|(path, contents)| {
                (
                    path,
                    FakeFile {
                        contents,
                        modified: UNIX_EPOCH,
                    },
                )
            })
            .collect();
        Fs(FsInner::Fake(Arc::new(Mutex::new(files))))
    }

    pub fn from_map(data: HashMap<String, impl Into<Vec<u8>>>) -> Self {
        let fs = data
            .into_iter()
            .map(|(path, contents)| (path.into(), contents.into()))
            .collect();
        Self::from_raw_map(fs)
    }

    /// Create a test filesystem rooted in real files
    ///
    /// Creates a test filesystem from the contents of `test_directory` rooted into `namespaced_to`.
    ///
    /// Example:
    /// Given:
    /// ```bash
    /// $ ls
    /// ./my-test-dir/aws-config
    /// ./my-test-dir/aws-config/config
    /// $ cat ./my-test-dir/aws-config/config
    /// test-config
    /// ```
    /// ```rust,no_run
    /// use aws_types::os_shim_internal::Fs;
    /// let test_fs = Fs::from_test_dir("my-test-dir/aws-config", "/Users/me/.aws");
    /// assert_eq!(test_fs.read_to_end("/Users/me/.aws/config").unwrap(), b"test-config");
    /// ```
    pub fn from_test_dir(
        test_directory: impl Into<PathBuf>,
        namespaced_to: impl Into<PathBuf>,
    ) -> Self {
        Fs(FsInner::Namespaced(NamespacedFs {
            real_path: test_directory.into(),
            namespaced_to: namespaced_to.into(),
        }))
    }

    /// Read the entire contents of a file
    ///
    /// A missing file is reported with [`ErrorKind::NotFound`] so that callers can tell it apart
    /// from other I/O failures.
    pub fn read_to_end(&self, path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        let path = path.as_ref();
        match &self.0 {
            FsInner::Real => std::fs::read(path),
            FsInner::Fake(files) => files
                .lock()
                .get(path.as_os_str())
                .map(|file| file.contents.clone())
                .ok_or_else(|| not_found(path)),
            FsInner::Namespaced(ns) => std::fs::read(ns.map(path)?),
        }
    }

    /// Last modification time of a file
    ///
    /// Like [`Fs::read_to_end`], a missing file is reported with [`ErrorKind::NotFound`].
    pub fn modified(&self, path: impl AsRef<Path>) -> io::Result<SystemTime> {
        let path = path.as_ref();
        match &self.0 {
            FsInner::Real => std::fs::metadata(path)?.modified(),
            FsInner::Fake(files) => files
                .lock()
                .get(path.as_os_str())
                .map(|file| file.modified)
                .ok_or_else(|| not_found(path)),
            FsInner::Namespaced(ns) => std::fs::metadata(ns.map(path)?)?.modified(),
        }
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match &self.0 {
            FsInner::Real => path.exists(),
            FsInner::Fake(files) => files.lock().contains_key(path.as_os_str()),
            FsInner::Namespaced(ns) => ns.map(path).map(|p| p.exists()).unwrap_or(false),
        }
    }

    /// Replace the contents of a file and set its modification time
    ///
    /// Fake file systems are updated in place; every clone of the same `Fs` observes the change.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let contents = contents.into();
        match &self.0 {
            FsInner::Real => write_real(path, &contents, modified),
            FsInner::Fake(files) => {
                let file = FakeFile { contents, modified };
                files.lock().insert(path.as_os_str().to_owned(), file);
                Ok(())
            }
            FsInner::Namespaced(ns) => write_real(&ns.map(path)?, &contents, modified),
        }
    }
}

/// Environment variable abstraction
///
/// Environment variables are global to a process, and, as such, are difficult to test with a multi-
/// threaded test runner like Rust's. This enables loading environment variables either from the
/// actual process environment ([`std::env::var`]) or from a hash map.
///
/// Process environments are cheap to clone:
/// - Faked process environments are wrapped in an internal Arc
/// - Real process environments are pointer-sized
#[derive(Clone, Debug)]
pub struct Env(EnvInner);

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

#[derive(Clone, Debug)]
enum EnvInner {
    Real,
    Fake(Arc<HashMap<String, String>>),
}

impl Env {
    pub fn get(&self, k: &str) -> Result<String, VarError> {
        match &self.0 {
            EnvInner::Real => std::env::var(k),
            EnvInner::Fake(map) => map.get(k).cloned().ok_or(VarError::NotPresent),
        }
    }

    /// Create a fake process environment from a slice of tuples.
    ///
    /// # Examples
    /// ```rust
    /// use aws_types::os_shim_internal::Env;
    /// let mock_env = Env::from_slice(&[
    ///     ("HOME", "/home/myname"),
    ///     ("AWS_CONFIG_FILE", "~/configs/aws"),
    /// ]);
    /// assert_eq!(mock_env.get("HOME").unwrap(), "/home/myname");
    /// ```
    pub fn from_slice<'a>(vars: &[(&'a str, &'a str)]) -> Self {
        let map: HashMap<_, _> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from(map)
    }

    /// Create a process environment that uses the real process environment
    ///
    /// Calls will be delegated to [`std::env::var`].
    pub fn real() -> Self {
        Self(EnvInner::Real)
    }
}

impl From<HashMap<String, String>> for Env {
    fn from(hash_map: HashMap<String, String>) -> Self {
        Self(EnvInner::Fake(Arc::new(hash_map)))
    }
}

/// Time source abstraction
///
/// Either the real system clock or a [`ManualTimeSource`] driven by the test.
#[derive(Clone, Debug)]
pub struct TimeSource(TimeSourceInner);

impl Default for TimeSource {
    fn default() -> Self {
        TimeSource::real()
    }
}

#[derive(Clone, Debug)]
enum TimeSourceInner {
    Real,
    Manual(ManualTimeSource),
}

impl TimeSource {
    /// Time source backed by [`SystemTime::now`]
    pub fn real() -> Self {
        TimeSource(TimeSourceInner::Real)
    }

    /// Time source that reads its time from `time_source`
    ///
    /// The returned `TimeSource` shares state with `time_source`: advancing either one moves both.
    pub fn manual(time_source: &ManualTimeSource) -> Self {
        TimeSource(TimeSourceInner::Manual(time_source.clone()))
    }

    pub fn now(&self) -> SystemTime {
        match &self.0 {
            TimeSourceInner::Real => SystemTime::now(),
            TimeSourceInner::Manual(manual) => manual.now(),
        }
    }
}

/// Clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualTimeSource {
    time: Arc<Mutex<SystemTime>>,
}

impl ManualTimeSource {
    pub fn new(start_time: SystemTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(start_time)),
        }
    }

    pub fn now(&self) -> SystemTime {
        *self.time.lock()
    }

    pub fn advance(&self, duration: Duration) {
        let mut time = self.time.lock();
        *time += duration;
    }

    pub fn set_time(&self, time: SystemTime) {
        *self.time.lock() = time;
    }
}
