/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Cross-crate types for the AWS SDK profile file loader.
//!
//! The only module exposed today is [`os_shim_internal`], which abstracts over the pieces of the
//! operating system that profile loading depends on (filesystem, environment variables and the
//! clock) so that they can be swapped out in tests.

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

pub mod os_shim_internal;
