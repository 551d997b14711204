/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Load profiles from the AWS shared config and credentials files
//!
//! Profile files are INI-like:
//!
//! ```ini
//! # comment lines start with `#` or `;`
//! [default]
//! region = us-east-1
//!
//! [profile dev]
//! region = us-west-2 ; trailing comments need whitespace before them
//! s3 =
//!   max_concurrent_requests = 20
//! ```
//!
//! - Config files (`~/.aws/config`) name profiles `[profile name]`, with the exception of
//!   `[default]`. When both `[default]` and `[profile default]` are present, only
//!   `[profile default]` is used.
//! - Credentials files (`~/.aws/credentials`) name profiles `[name]`.
//! - Indented lines continue the previous property. If that property had an empty value, the
//!   indented lines are sub-properties (`name = value`), stored as raw text in the value.
//! - Profiles and properties with invalid names, or in the wrong style for the file, are ignored
//!   with a warning.
//!
//! [`ProfileFile`] is the parsed, immutable result. [`ProfileFileSupplier`] decides when to load
//! or reload it; [`source`] locates the default files.

mod error;
mod normalize;
mod parse;
mod profile_file;
pub mod source;
pub mod supplier;

pub use error::ProfileFileError;
pub use parse::ProfileParseError;
pub use profile_file::{Aggregator, Profile, ProfileFile, ProfileFileKind, Property};
pub use supplier::{ProfileFileSupplier, MODIFICATION_TIME_JITTER};
