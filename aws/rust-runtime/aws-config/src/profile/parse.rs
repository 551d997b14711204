/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Profile file grammar
//!
//! A single forward pass over the file that turns each physical line into one of: nothing (blank
//! lines and comments), a new section (`[profile name]`), a new property (`name = value`), or a
//! continuation of the previous property (an indented line).
//!
//! Sections and properties that are dropped (see [`normalize`](super::normalize)) are skipped
//! as soon as their header or name is read. Lines inside them are not checked against the
//! grammar. The output keeps every other section and property in file order so that later
//! definitions can override earlier ones.

use crate::profile::normalize::{property_is_valid, section_is_valid};
use crate::profile::profile_file::ProfileFileKind;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

const WHITESPACE: &[char] = &[' ', '\t'];
const COMMENT: &[char] = &['#', ';'];

/// The name of a section as written in its header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SectionName<'a> {
    pub(super) name: &'a str,
    pub(super) has_profile_prefix: bool,
}

impl<'a> SectionName<'a> {
    /// Parse the text between `[` and `]`
    ///
    /// `profile` must be followed by at least one space or tab to count as a prefix: `[profilefoo]`
    /// names a profile called `profilefoo`.
    fn parse(header: &'a str) -> Self {
        let header = header.trim_matches(WHITESPACE);
        match header.strip_prefix("profile") {
            Some(rest) if rest.starts_with(WHITESPACE) => SectionName {
                name: rest.trim_matches(WHITESPACE),
                has_profile_prefix: true,
            },
            _ => SectionName {
                name: header,
                has_profile_prefix: false,
            },
        }
    }
}

/// One `[...]` block and the properties defined beneath it
#[derive(Debug)]
pub(super) struct Section<'a> {
    pub(super) name: SectionName<'a>,
    pub(super) line_number: usize,
    pub(super) properties: Vec<RawProperty<'a>>,
}

#[derive(Debug)]
pub(super) struct RawProperty<'a> {
    pub(super) name: &'a str,
    pub(super) value: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    line_number: usize,
    path: Option<String>,
}

/// An error encountered while parsing a profile file
///
/// The message identifies the grammar rule that was violated, eg. `Expected a profile definition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileParseError {
    location: Location,
    message: String,
}

impl ProfileParseError {
    fn new(location: &Location, message: impl Into<String>) -> Self {
        ProfileParseError {
            location: location.clone(),
            message: message.into(),
        }
    }

    /// Description of the rule that was violated
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line number of the offending line
    pub fn line_number(&self) -> usize {
        self.location.line_number
    }

    /// Path of the file being parsed, when it was loaded from disk
    pub fn path(&self) -> Option<&str> {
        self.location.path.as_deref()
    }
}

impl Display for ProfileParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error parsing {} on line {}:\n  {}",
            self.location.path.as_deref().unwrap_or("profile file"),
            self.location.line_number,
            self.message
        )
    }
}

impl Error for ProfileParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Starting,
    ReadingProfile,
    /// A property was just defined; indented lines continue it. When its value was empty, the
    /// continuation lines are sub-properties and must look like `name = value`.
    ReadingProperty { is_subproperty: bool },
    /// Inside a dropped section: everything up to the next header is skipped
    IgnoringProfile,
    /// A dropped property was just defined: its continuation lines are skipped
    IgnoringProperty,
}

struct Parser<'a> {
    sections: Vec<Section<'a>>,
    state: State,
    kind: ProfileFileKind,
    location: Location,
}

/// Parse a profile file into its sections, in file order
pub(super) fn parse_profile_file<'a>(
    contents: &'a str,
    path: Option<&str>,
    kind: ProfileFileKind,
) -> Result<Vec<Section<'a>>, ProfileParseError> {
    let mut parser = Parser {
        sections: Vec::new(),
        state: State::Starting,
        kind,
        location: Location {
            line_number: 0,
            path: path.map(str::to_owned),
        },
    };
    parser.parse_profile(contents)?;
    Ok(parser.sections)
}

impl<'a> Parser<'a> {
    fn parse_profile(&mut self, file: &'a str) -> Result<(), ProfileParseError> {
        for (line_number, line) in file.lines().enumerate() {
            self.location.line_number = line_number + 1;
            let line = line.trim_end_matches('\r');
            if is_empty_line(line) || is_comment_line(line) {
                continue;
            }
            if line.starts_with('[') {
                self.read_profile_line(line)?;
            } else if line.starts_with(WHITESPACE) {
                self.read_property_continuation(line)?;
            } else {
                self.read_property_line(line)?;
            }
        }
        Ok(())
    }

    /// `[profile name]` or `[name]`, optionally followed by a comment
    fn read_profile_line(&mut self, line: &'a str) -> Result<(), ProfileParseError> {
        let line = prepare_line(line, false);
        let header = match line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            Some(header) => header,
            None => {
                return Err(ProfileParseError::new(
                    &self.location,
                    "Profile definition must end with ']'",
                ))
            }
        };
        let name = SectionName::parse(header);
        if !section_is_valid(name, self.kind, self.location.line_number) {
            self.state = State::IgnoringProfile;
            return Ok(());
        }
        self.sections.push(Section {
            name,
            line_number: self.location.line_number,
            properties: Vec::new(),
        });
        self.state = State::ReadingProfile;
        Ok(())
    }

    /// `name = value` directly beneath a profile header
    fn read_property_line(&mut self, line: &'a str) -> Result<(), ProfileParseError> {
        match self.state {
            State::Starting => {
                return Err(ProfileParseError::new(
                    &self.location,
                    "Expected a profile definition",
                ))
            }
            State::IgnoringProfile => return Ok(()),
            State::ReadingProfile | State::ReadingProperty { .. } | State::IgnoringProperty => {}
        }
        let line = prepare_line(line, true);
        let (name, value) = parse_property_line(line)
            .map_err(|err| ProfileParseError::new(&self.location, err.message()))?;
        let location = &self.location;
        let section = match self.sections.last_mut() {
            Some(section) => section,
            None => {
                return Err(ProfileParseError::new(
                    location,
                    "Expected a profile definition",
                ))
            }
        };
        if !property_is_valid(name, section.name.name, location.line_number) {
            self.state = State::IgnoringProperty;
            return Ok(());
        }
        section.properties.push(RawProperty {
            name,
            value: Cow::Borrowed(value),
        });
        self.state = State::ReadingProperty {
            is_subproperty: value.is_empty(),
        };
        Ok(())
    }

    /// An indented line extending the previous property
    fn read_property_continuation(&mut self, line: &'a str) -> Result<(), ProfileParseError> {
        let is_subproperty = match self.state {
            State::ReadingProperty { is_subproperty } => is_subproperty,
            State::IgnoringProfile | State::IgnoringProperty => return Ok(()),
            State::Starting | State::ReadingProfile => {
                return Err(ProfileParseError::new(
                    &self.location,
                    "Expected a profile or property definition",
                ))
            }
        };
        let line = line.trim_matches(WHITESPACE);
        if is_subproperty {
            // sub-properties are stored as raw text, but they must still be well formed
            parse_property_line(line)
                .map_err(|err| ProfileParseError::new(&self.location, err.message()))?;
        }
        let location = &self.location;
        let property = match self
            .sections
            .last_mut()
            .and_then(|section| section.properties.last_mut())
        {
            Some(property) => property,
            None => {
                return Err(ProfileParseError::new(
                    location,
                    "Expected a profile or property definition",
                ))
            }
        };
        let value = property.value.to_mut();
        value.push('\n');
        value.push_str(line);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyError {
    NoEquals,
    NoName,
}

impl PropertyError {
    fn message(self) -> &'static str {
        match self {
            PropertyError::NoEquals => "Expected an '=' sign defining a property",
            PropertyError::NoName => "Property did not have a name",
        }
    }
}

/// Split `name = value` on the first `=`, trimming both halves
fn parse_property_line(line: &str) -> Result<(&str, &str), PropertyError> {
    let line = line.trim_matches(WHITESPACE);
    let (name, value) = line.split_once('=').ok_or(PropertyError::NoEquals)?;
    let name = name.trim_matches(WHITESPACE);
    let value = value.trim_matches(WHITESPACE);
    if name.is_empty() {
        return Err(PropertyError::NoName);
    }
    Ok((name, value))
}

/// Strip a trailing comment and surrounding whitespace
///
/// On property lines a comment must be preceded by whitespace so that values such as
/// `value;with;semicolons` survive intact. Profile header lines end at the first `#` or `;`.
fn prepare_line(line: &str, comments_need_whitespace: bool) -> &str {
    let line = line.trim_matches(WHITESPACE);
    let mut prev_char_whitespace = false;
    let mut comment_idx = None;
    for (idx, chr) in line.char_indices() {
        if COMMENT.contains(&chr) && (prev_char_whitespace || !comments_need_whitespace) {
            comment_idx = Some(idx);
            break;
        }
        prev_char_whitespace = WHITESPACE.contains(&chr);
    }
    comment_idx
        .map(|idx| &line[..idx])
        .unwrap_or(line)
        .trim_matches(WHITESPACE)
}

fn is_empty_line(line: &str) -> bool {
    line.trim_matches(WHITESPACE).is_empty()
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with(COMMENT)
}
