// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Faultline error tracking SDK.
//!
//! This crate provides the shared data model for error capture: the canonical
//! [`ErrorReport`] record that the SDK builds for every captured event, the
//! [`Severity`] scale, and the [`IgnoreRule`] variants used to suppress
//! known-noisy errors. It performs no I/O; the `faultline` crate owns the
//! capture pipeline and delivery.

pub mod error;
pub mod report;
pub mod rule;

pub use error::{CoreError, Result};
pub use report::{ErrorReport, Severity};
pub use rule::IgnoreRule;
