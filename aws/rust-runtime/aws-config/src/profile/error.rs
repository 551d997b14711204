/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::profile::parse::ProfileParseError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load a profile file
///
/// A missing file is never an error; it loads as an empty [`ProfileFile`](crate::profile::ProfileFile).
/// Profiles or properties with invalid names are dropped rather than reported.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileFileError {
    /// The file did not follow the profile file grammar
    #[error(transparent)]
    CouldNotParseProfile(#[from] ProfileParseError),

    /// The file exists but could not be read
    #[error("could not read profile file {}", describe(.path))]
    CouldNotReadFile {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// The file contents were not UTF-8
    #[error("profile file {} is not valid UTF-8", describe(.path))]
    InvalidUtf8 { path: Option<PathBuf> },

    /// A property was present but its value could not be interpreted
    #[error("{message}")]
    InvalidProperty {
        profile: String,
        property: String,
        message: String,
    },
}

fn describe(path: &Option<PathBuf>) -> String {
    match path.as_deref() {
        Some(path) => format!("`{}`", path.display()),
        None => "<stream>".to_string(),
    }
}

impl ProfileFileError {
    pub(crate) fn could_not_read(path: Option<&Path>, source: io::Error) -> Self {
        ProfileFileError::CouldNotReadFile {
            path: path.map(Path::to_path_buf),
            source,
        }
    }
}
