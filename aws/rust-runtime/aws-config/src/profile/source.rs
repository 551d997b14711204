/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Default locations of the shared config and credentials files

use crate::fs_util::{home_dir, Os};
use crate::profile::error::ProfileFileError;
use crate::profile::profile_file::{ProfileFile, ProfileFileKind};
use aws_types::os_shim_internal::{Env, Fs};
use std::path::PathBuf;

/// Overrides the location of the config file
pub const ENV_VAR_CONFIG_FILE: &str = "AWS_CONFIG_FILE";

/// Overrides the location of the credentials file
pub const ENV_VAR_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";

const HOME_EXPANSION_FAILURE_WARNING: &str =
    "home directory expansion was requested (via `~` character) for the profile \
     config file path, but no home directory could be determined";

/// Location of the file of the given kind
///
/// Environment variable overrides are honored; otherwise `~/.aws/config` or
/// `~/.aws/credentials`. A leading `~` is expanded to the home directory.
pub fn location(kind: ProfileFileKind, env: &Env) -> PathBuf {
    location_for_os(kind, env, Os::real())
}

fn location_for_os(kind: ProfileFileKind, env: &Env, os: Os) -> PathBuf {
    let (env_var, default) = match kind {
        ProfileFileKind::Config => (ENV_VAR_CONFIG_FILE, "~/.aws/config"),
        ProfileFileKind::Credentials => (ENV_VAR_CREDENTIALS_FILE, "~/.aws/credentials"),
    };
    let path = env.get(env_var).ok();
    let path = path.as_deref().unwrap_or(default);
    let home = home_dir(env, os);
    expand_home(path, home.as_deref())
}

/// Expand a leading `~` into `home`
///
/// Only `~` on its own or followed by a path separator is expanded: `~user/` is left as is.
fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };
    match home {
        Some(home) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            let mut expanded = PathBuf::from(home);
            if !rest.is_empty() {
                expanded.push(rest);
            }
            expanded
        }
        None => {
            tracing::warn!(path = %path, "{}", HOME_EXPANSION_FAILURE_WARNING);
            PathBuf::from(path)
        }
    }
}

/// Load and merge the default credentials and config files
///
/// Config file values take precedence over credentials file values. Missing files are treated
/// as empty.
pub fn load(fs: &Fs, env: &Env) -> Result<ProfileFile, ProfileFileError> {
    let credentials = load_kind(fs, env, ProfileFileKind::Credentials)?;
    let config = load_kind(fs, env, ProfileFileKind::Config)?;
    Ok(ProfileFile::aggregate([&credentials, &config]))
}

fn load_kind(fs: &Fs, env: &Env, kind: ProfileFileKind) -> Result<ProfileFile, ProfileFileError> {
    let path = location(kind, env);
    tracing::debug!(path = %path.display(), kind = ?kind, "loading profile file");
    ProfileFile::load(fs, &path, kind)
}
