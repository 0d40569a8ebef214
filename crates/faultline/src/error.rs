// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Faultline SDK.
//!
//! Only [`SdkError::MissingApiKey`] is ever surfaced to the host application
//! (from `init`). Everything else is logged and swallowed inside the capture
//! pipeline; the SDK must never become a new source of host crashes.

use thiserror::Error;

/// Errors that can occur in the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
	/// `init` was called without a non-empty API key.
	#[error("api_key is required")]
	MissingApiKey,

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// The collection API returned a non-success status.
	#[error("server returned status {status}")]
	ServerError {
		/// HTTP status code.
		status: u16,
	},
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
