// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Faultline error tracking SDK.
//!
//! Captures unhandled panics and explicit error/message reports from a host
//! application, enriches them with system, user, tag and metadata context,
//! and forwards them to a remote collection API. Delivery is synchronous and
//! best-effort: a failed delivery is logged and dropped, never retried, and
//! nothing in the SDK (apart from `init` with a missing API key) can fail
//! into the host.
//!
//! # Example
//!
//! ```ignore
//! faultline::init(
//!     faultline::Options::new()
//!         .api_key("fl_live_xxx")
//!         .api_url("https://errors.example.com/api")
//!         .environment("production")
//!         .release(env!("CARGO_PKG_VERSION")),
//! )?;
//!
//! // Panics are now reported automatically. Explicit captures:
//! if let Err(e) = run() {
//!     faultline::capture_error(&e);
//! }
//! faultline::capture_message("cache warmed");
//! ```

shadow_rs::shadow!(build);

mod client;
mod config;
mod context;
mod error;
mod filter;
mod framework;
mod hook;
mod normalize;
mod transport;

pub use client::Tracker;
pub use config::{BeforeSend, Options};
pub use error::{Result, SdkError};
pub use faultline_core::{ErrorReport, IgnoreRule, Severity};
pub use transport::{HttpTransport, Transport};

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::{Map, Value};

static TRACKER: OnceLock<Tracker> = OnceLock::new();

/// The process-wide tracker instance backing the crate-level functions.
pub fn tracker() -> &'static Tracker {
	TRACKER.get_or_init(Tracker::new)
}

/// Initializes the process-wide tracker. See [`Tracker::init`].
pub fn init(options: Options) -> Result<()> {
	tracker().init(options)
}

/// Captures an error with severity `error`.
pub fn capture_error<E>(error: &E)
where
	E: std::error::Error + ?Sized,
{
	tracker().capture_error(error);
}

/// Captures an error with explicit severity and call-site metadata.
pub fn capture_error_with<E>(error: &E, severity: Severity, metadata: Option<Map<String, Value>>)
where
	E: std::error::Error + ?Sized,
{
	tracker().capture_error_with(error, severity, metadata);
}

/// Captures a message with severity `info`.
pub fn capture_message(message: &str) {
	tracker().capture_message(message);
}

/// Captures a message with explicit severity and call-site metadata.
pub fn capture_message_with(message: &str, severity: Severity, metadata: Option<Map<String, Value>>) {
	tracker().capture_message_with(message, severity, metadata);
}

/// Replaces the user identity map on the process-wide tracker.
pub fn set_user(user: Map<String, Value>) {
	tracker().set_user(user);
}

/// Merges tags into the process-wide tracker's tag map.
pub fn set_tags(tags: HashMap<String, String>) {
	tracker().set_tags(tags);
}

/// Merges metadata into the process-wide tracker's metadata map.
pub fn set_metadata(metadata: Map<String, Value>) {
	tracker().set_metadata(metadata);
}

/// Enables or disables capture on the process-wide tracker.
pub fn set_enabled(enabled: bool) {
	tracker().set_enabled(enabled);
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::MockTransport;

	#[test]
	fn global_functions_share_one_tracker() {
		let transport = MockTransport::new();

		init(
			Options::new()
				.api_key("key")
				.transport(transport.clone())
				.auto_capture_panics(false),
		)
		.unwrap();

		// Second init is a warn-and-keep no-op.
		init(Options::new().api_key("other").auto_capture_panics(false)).unwrap();

		capture_message("global check");
		set_tags(std::collections::HashMap::from([(
			"via".to_string(),
			"global".to_string(),
		)]));
		capture_message("tagged");

		let reports = transport.reports();
		assert_eq!(reports.len(), 2);
		assert_eq!(reports[1].metadata["tags"]["via"], "global");
		assert!(tracker().is_initialized());
	}
}
