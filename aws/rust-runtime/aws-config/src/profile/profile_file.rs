/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::profile::error::ProfileFileError;
use crate::profile::normalize::normalize;
use crate::profile::parse::parse_profile_file;
use aws_types::os_shim_internal::Fs;
use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

/// The kind of file a profile was loaded from
///
/// The kind decides which section headers are accepted: config files require `[profile name]`
/// (except for `[default]`), credentials files require `[name]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFileKind {
    /// The shared config file, `~/.aws/config` by default
    Config,
    /// The shared credentials file, `~/.aws/credentials` by default
    Credentials,
}

/// Key-Value property pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value of the property
    ///
    /// Continuation lines and sub-properties are part of the value, separated by `\n`.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Named profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    properties: HashMap<String, Property>,
}

impl Profile {
    pub fn new(name: impl Into<String>, properties: HashMap<String, Property>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the property `name`, if set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|prop| prop.value())
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// All properties of this profile, in no particular order
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Interpret the property `name` as a boolean
    ///
    /// `true` and `false` are accepted in any ASCII case. An unset property is `Ok(None)`; any
    /// other value is an error.
    pub fn boolean_property(&self, name: &str) -> Result<Option<bool>, ProfileFileError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(value) => Err(ProfileFileError::InvalidProperty {
                profile: self.name.clone(),
                property: name.to_string(),
                message: format!(
                    "Profile property '{}' must be set to 'true', 'false' or unset, but was set to '{}'.",
                    name, value
                ),
            }),
        }
    }

    fn merge_from(&mut self, other: &Profile) {
        self.properties.extend(
            other
                .properties
                .iter()
                .map(|(name, property)| (name.clone(), property.clone())),
        );
    }
}

/// Parsed profile file: an immutable set of named profiles
///
/// `ProfileFile` is cheap to clone; clones share the same underlying profiles, which can be
/// checked with [`ProfileFile::ptr_eq`].
///
/// # Examples
/// ```rust
/// use aws_config::profile::{ProfileFile, ProfileFileKind};
/// let file = ProfileFile::parse(
///     "[profile foo]\nregion = us-west-2\ns3 =\n  max_concurrent_requests = 10",
///     ProfileFileKind::Config,
/// ).unwrap();
/// let foo = file.profile("foo").unwrap();
/// assert_eq!(foo.get("region"), Some("us-west-2"));
/// assert_eq!(foo.get("s3"), Some("\nmax_concurrent_requests = 10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFile {
    inner: Arc<Inner>,
}

#[derive(Debug, PartialEq, Eq)]
struct Inner {
    kind: Option<ProfileFileKind>,
    profiles: HashMap<String, Profile>,
}

impl ProfileFile {
    fn new(kind: Option<ProfileFileKind>, profiles: HashMap<String, Profile>) -> Self {
        ProfileFile {
            inner: Arc::new(Inner { kind, profiles }),
        }
    }

    /// A file with no profiles
    pub fn empty(kind: ProfileFileKind) -> Self {
        Self::new(Some(kind), HashMap::new())
    }

    /// Parse in-memory profile file contents
    pub fn parse(contents: &str, kind: ProfileFileKind) -> Result<Self, ProfileFileError> {
        Self::from_contents(contents, None, kind)
    }

    /// Read and parse profile file contents from any byte stream
    pub fn from_reader(
        mut reader: impl Read,
        kind: ProfileFileKind,
    ) -> Result<Self, ProfileFileError> {
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|err| ProfileFileError::could_not_read(None, err))?;
        let contents = match String::from_utf8(contents) {
            Ok(contents) => contents,
            Err(_) => return Err(ProfileFileError::InvalidUtf8 { path: None }),
        };
        Self::parse(&contents, kind)
    }

    /// Load the profile file at `path`
    ///
    /// A file that does not exist loads as an empty profile file. Other I/O failures, invalid
    /// UTF-8 and grammar violations are errors.
    pub fn load(
        fs: &Fs,
        path: impl AsRef<Path>,
        kind: ProfileFileKind,
    ) -> Result<Self, ProfileFileError> {
        let path = path.as_ref();
        let contents = match fs.read_to_end(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    path = %path.display(),
                    "profile file not found; using an empty profile file"
                );
                return Ok(Self::empty(kind));
            }
            Err(err) => return Err(ProfileFileError::could_not_read(Some(path), err)),
        };
        let contents = String::from_utf8(contents).map_err(|_| ProfileFileError::InvalidUtf8 {
            path: Some(path.to_path_buf()),
        })?;
        let file = Self::from_contents(&contents, Some(path), kind)?;
        tracing::debug!(
            path = %path.display(),
            kind = ?kind,
            profiles = file.inner.profiles.len(),
            "loaded profile file"
        );
        Ok(file)
    }

    fn from_contents(
        contents: &str,
        path: Option<&Path>,
        kind: ProfileFileKind,
    ) -> Result<Self, ProfileFileError> {
        let path = path.map(|path| path.display().to_string());
        let sections = parse_profile_file(contents, path.as_deref(), kind)?;
        Ok(Self::new(Some(kind), normalize(sections, kind)))
    }

    /// Merge several profile files into one
    ///
    /// Profiles with the same name are merged. When two files define the same property of the
    /// same profile, the file that comes later wins. The conventional order is the credentials
    /// file followed by the config file.
    pub fn aggregate<'a>(files: impl IntoIterator<Item = &'a ProfileFile>) -> Self {
        let mut kind = None;
        let mut profiles: HashMap<String, Profile> = HashMap::new();
        for (idx, file) in files.into_iter().enumerate() {
            kind = match idx {
                0 => file.kind(),
                _ if kind == file.kind() => kind,
                _ => None,
            };
            for (name, profile) in &file.inner.profiles {
                profiles
                    .entry(name.clone())
                    .and_modify(|existing| existing.merge_from(profile))
                    .or_insert_with(|| profile.clone());
            }
        }
        Self::new(kind, profiles)
    }

    /// Builder-style alternative to [`ProfileFile::aggregate`]
    pub fn aggregator() -> Aggregator {
        Aggregator::default()
    }

    /// The kind of file this was loaded from
    ///
    /// `None` for an aggregate of files of different kinds (or of no files at all).
    pub fn kind(&self) -> Option<ProfileFileKind> {
        self.inner.kind
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.inner.profiles.get(name)
    }

    pub fn profiles(&self) -> &HashMap<String, Profile> {
        &self.inner.profiles
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.inner.profiles.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.profiles.is_empty()
    }

    /// Returns true if both handles point at the same loaded file
    pub fn ptr_eq(a: &ProfileFile, b: &ProfileFile) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

/// Collects profile files to merge with [`ProfileFile::aggregate`]
#[derive(Debug, Default)]
pub struct Aggregator {
    files: Vec<ProfileFile>,
}

impl Aggregator {
    /// Add a file; files added later take precedence
    pub fn add_file(mut self, file: ProfileFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn build(self) -> ProfileFile {
        ProfileFile::aggregate(&self.files)
    }
}
