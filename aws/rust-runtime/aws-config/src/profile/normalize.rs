/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Rules for which sections and properties are kept, and the merge into profiles
//!
//! Sections that cannot belong in the file (wrong `profile` prefix for the file kind, invalid
//! names) and properties with invalid names are dropped with a warning while parsing, so that
//! nothing inside them can fail the load. Sections with the same name are merged here, later
//! properties overriding earlier ones.

use crate::profile::parse::{Section, SectionName};
use crate::profile::profile_file::{Profile, ProfileFileKind, Property};
use std::borrow::Cow;
use std::collections::HashMap;

const DEFAULT: &str = "default";
const PROFILE_PREFIX: &str = "profile";

/// Build the profiles of a single file
pub(super) fn normalize(
    sections: Vec<Section<'_>>,
    kind: ProfileFileKind,
) -> HashMap<String, Profile> {
    // `[profile default]` shadows `[default]` in the config file, wherever it appears
    let prefixed_default_exists = kind == ProfileFileKind::Config
        && sections
            .iter()
            .any(|section| section.name.has_profile_prefix && section.name.name == DEFAULT);

    let mut profiles: HashMap<&str, HashMap<&str, Cow<'_, str>>> = HashMap::new();
    for section in sections {
        if prefixed_default_exists && is_bare_default(section.name) {
            tracing::warn!(
                line = section.line_number,
                "profile `default` ignored because `[profile default]` was found which takes priority"
            );
            continue;
        }
        let properties = profiles.entry(section.name.name).or_default();
        for property in section.properties {
            properties.insert(property.name, property.value);
        }
    }

    profiles
        .into_iter()
        .map(|(name, properties)| {
            let properties = properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), Property::new(k, v.into_owned())))
                .collect();
            (name.to_string(), Profile::new(name, properties))
        })
        .collect()
}

fn is_bare_default(name: SectionName<'_>) -> bool {
    name.name == DEFAULT && !name.has_profile_prefix
}

/// Returns true if a section with this header belongs in a file of `kind`
pub(super) fn section_is_valid(
    section: SectionName<'_>,
    kind: ProfileFileKind,
    line_number: usize,
) -> bool {
    let SectionName {
        name,
        has_profile_prefix,
    } = section;
    if !validate_identifier(name) {
        tracing::warn!(
            line = line_number,
            "profile `{}` ignored because `{}` is not a valid profile name",
            name,
            name
        );
        return false;
    }
    match kind {
        ProfileFileKind::Config if !has_profile_prefix && name != DEFAULT => {
            tracing::warn!(
                line = line_number,
                "profile `{}` ignored; sections in the AWS config file (other than [default]) must have a prefix i.e. [{} {}]",
                name,
                PROFILE_PREFIX,
                name
            );
            false
        }
        ProfileFileKind::Credentials if has_profile_prefix => {
            tracing::warn!(
                line = line_number,
                "profile `{}` ignored because credential profiles must NOT begin with `{}`",
                name,
                PROFILE_PREFIX
            );
            false
        }
        ProfileFileKind::Config | ProfileFileKind::Credentials => true,
    }
}

/// Returns true if a property called `name` is kept
pub(super) fn property_is_valid(name: &str, profile: &str, line_number: usize) -> bool {
    if validate_identifier(name) {
        return true;
    }
    tracing::warn!(
        line = line_number,
        "property `{}` in profile `{}` ignored because `{}` is not a valid property name",
        name,
        profile,
        name
    );
    false
}

/// Profile and property names: `[A-Za-z0-9_\-/.%@:\+]+`
fn validate_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.' | '%' | '@' | ':' | '+')
}
