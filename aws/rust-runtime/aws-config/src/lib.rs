/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Parsing and reloading of the AWS shared config and credentials files.
//!
//! See the [`profile`] module for the file format and the loading policies.

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

mod fs_util;
pub mod profile;
