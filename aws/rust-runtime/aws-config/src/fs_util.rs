/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_types::os_shim_internal::Env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Os {
    Windows,
    NotWindows,
}

impl Os {
    pub(crate) fn real() -> Self {
        if cfg!(windows) {
            Os::Windows
        } else {
            Os::NotWindows
        }
    }
}

/// Resolve the home directory of the current user
///
/// 1. `$HOME`
/// 2. On Windows: `$USERPROFILE`, then `$HOMEDRIVE$HOMEPATH`
///
/// Unset or empty variables are skipped.
pub(crate) fn home_dir(env: &Env, os: Os) -> Option<String> {
    let var = |name: &str| env.get(name).ok().filter(|value| !value.is_empty());
    if let Some(home) = var("HOME") {
        tracing::debug!(src = "HOME", "loaded home directory");
        return Some(home);
    }
    if os == Os::Windows {
        if let Some(home) = var("USERPROFILE") {
            tracing::debug!(src = "USERPROFILE", "loaded home directory");
            return Some(home);
        }
        if let (Some(drive), Some(path)) = (var("HOMEDRIVE"), var("HOMEPATH")) {
            tracing::debug!(src = "HOMEDRIVE/HOMEPATH", "loaded home directory");
            return Some(format!("{}{}", drive, path));
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::{home_dir, Os};
    use aws_types::os_shim_internal::Env;

    #[test]
    fn home_takes_priority() {
        let env = Env::from_slice(&[
            ("HOME", "/user/foo"),
            ("USERPROFILE", "C:\\Users\\foo"),
        ]);
        let home = Some("/user/foo".to_string());
        assert_eq!(home_dir(&env, Os::NotWindows), home);
        assert_eq!(home_dir(&env, Os::Windows), home);
    }

    #[test]
    fn windows_fallbacks() {
        let env = Env::from_slice(&[("USERPROFILE", "C:\\Users\\foo")]);
        assert_eq!(home_dir(&env, Os::NotWindows), None);
        assert_eq!(
            home_dir(&env, Os::Windows),
            Some("C:\\Users\\foo".to_string())
        );

        let env = Env::from_slice(&[("HOMEDRIVE", "D:"), ("HOMEPATH", "\\Users\\foo")]);
        assert_eq!(
            home_dir(&env, Os::Windows),
            Some("D:\\Users\\foo".to_string())
        );

        let env = Env::from_slice(&[("HOMEDRIVE", "D:")]);
        assert_eq!(home_dir(&env, Os::Windows), None);
    }

    #[test]
    fn empty_variables_are_ignored() {
        let env = Env::from_slice(&[("HOME", ""), ("USERPROFILE", "C:\\Users\\foo")]);
        assert_eq!(home_dir(&env, Os::NotWindows), None);
        assert_eq!(
            home_dir(&env, Os::Windows),
            Some("C:\\Users\\foo".to_string())
        );
    }
}
