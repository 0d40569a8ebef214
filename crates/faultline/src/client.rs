// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracker and its capture pipeline.
//!
//! Every capture call runs synchronously on the calling thread:
//! disabled check -> (errors only) ignore check -> (errors only) sampling ->
//! normalize -> enrich with context -> `before_send` hook -> deliver.
//! Nothing past the disabled check can fail into the host application;
//! soft failures are logged and the capture degrades to a dropped report.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use faultline_core::{ErrorReport, Severity};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{Config, Options};
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::{context, filter, framework, hook, normalize};

/// Frozen per-init state. Config maps stay mutable through the setters; the
/// framework name and transport are resolved once and never re-probed.
struct State {
	config: Config,
	framework: Option<String>,
	transport: Arc<dyn Transport>,
}

struct TrackerInner {
	state: RwLock<Option<State>>,
	hook_installed: AtomicBool,
}

/// Client for capturing errors and messages and reporting them to the
/// collection API.
///
/// A `Tracker` is a cheap-to-clone handle; clones share state. Most hosts use
/// the process-wide instance through the crate-level functions rather than
/// constructing their own.
///
/// # Example
///
/// ```ignore
/// let tracker = Tracker::new();
/// tracker.init(Options::new().api_key("fl_live_xxx"))?;
///
/// if let Err(e) = do_something() {
///     tracker.capture_error(&e);
/// }
/// ```
#[derive(Clone)]
pub struct Tracker {
	inner: Arc<TrackerInner>,
}

impl Tracker {
	/// Creates an uninitialized tracker.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(TrackerInner {
				state: RwLock::new(None),
				hook_installed: AtomicBool::new(false),
			}),
		}
	}

	/// Initializes the tracker.
	///
	/// A missing or empty API key is the only hard failure. Calling `init`
	/// again while configured logs a warning and leaves the first
	/// configuration intact. When enabled, this installs the chaining panic
	/// hook (at most once per tracker).
	pub fn init(&self, options: Options) -> Result<()> {
		let install_hook = {
			let mut state = self.inner.state.write();
			if state.is_some() {
				warn!("faultline already initialized, keeping existing configuration");
				return Ok(());
			}

			let bootstrap = options.into_parts()?;
			let config = bootstrap.config;
			let framework = bootstrap.framework.or_else(framework::detect);
			let transport: Arc<dyn Transport> = match bootstrap.transport {
				Some(transport) => transport,
				None => Arc::new(HttpTransport::new(&config.api_url, config.api_key.as_str())?),
			};

			let install_hook = config.enabled && bootstrap.auto_capture_panics;
			info!(
				api_url = %config.api_url,
				environment = config.environment.as_deref(),
				framework = framework.as_deref(),
				"faultline initialized"
			);
			*state = Some(State {
				config,
				framework,
				transport,
			});
			install_hook
		};

		if install_hook && !self.inner.hook_installed.swap(true, Ordering::SeqCst) {
			hook::install(self.clone());
		}
		Ok(())
	}

	/// Returns true once `init` has succeeded.
	pub fn is_initialized(&self) -> bool {
		self.inner.state.read().is_some()
	}

	/// Captures an error with severity `error` and no call-site metadata.
	pub fn capture_error<E>(&self, error: &E)
	where
		E: std::error::Error + ?Sized,
	{
		self.capture_error_with(error, Severity::Error, None);
	}

	/// Captures an error with explicit severity and call-site metadata.
	///
	/// Subject to the ignore list and sampling; a suppressed capture makes no
	/// delivery attempt.
	pub fn capture_error_with<E>(
		&self,
		error: &E,
		severity: Severity,
		metadata: Option<Map<String, Value>>,
	) where
		E: std::error::Error + ?Sized,
	{
		let prepared = {
			let guard = self.inner.state.read();
			let Some(state) = active_state(&guard) else {
				return;
			};

			let error_type = std::any::type_name_of_val(error);
			let message = error.to_string();
			if filter::should_ignore(&state.config.ignore_errors, error_type, &message) {
				debug!(error_type, "report suppressed by ignore list");
				return;
			}
			if !filter::sample_passes(state.config.sample_rate) {
				debug!(error_type, "report dropped by sampling");
				return;
			}

			finalize(state, normalize::normalize_error(error, severity), metadata)
		};
		deliver(prepared);
	}

	/// Captures a message with severity `info`.
	pub fn capture_message(&self, message: &str) {
		self.capture_message_with(message, Severity::Info, None);
	}

	/// Captures a message with explicit severity and call-site metadata.
	///
	/// Messages are intentional, low-volume captures: they bypass both the
	/// ignore list and sampling.
	pub fn capture_message_with(
		&self,
		message: &str,
		severity: Severity,
		metadata: Option<Map<String, Value>>,
	) {
		let prepared = {
			let guard = self.inner.state.read();
			let Some(state) = active_state(&guard) else {
				return;
			};
			finalize(state, normalize::normalize_message(message, severity), metadata)
		};
		deliver(prepared);
	}

	/// Captures an uncaught panic from the process-wide hook.
	pub(crate) fn capture_panic(&self, info: &PanicHookInfo<'_>) {
		let prepared = {
			let guard = self.inner.state.read();
			let Some(state) = active_state(&guard) else {
				return;
			};

			let report = normalize::normalize_panic(info);
			if filter::should_ignore(&state.config.ignore_errors, &report.error_type, &report.message)
			{
				return;
			}
			if !filter::sample_passes(state.config.sample_rate) {
				return;
			}
			finalize(state, report, None)
		};
		deliver(prepared);
	}

	/// Captures a panic payload caught by an integration (e.g. request
	/// middleware) before it resumes the unwind.
	pub fn capture_unwind(&self, payload: &dyn Any, metadata: Option<Map<String, Value>>) {
		let prepared = {
			let guard = self.inner.state.read();
			let Some(state) = active_state(&guard) else {
				return;
			};

			let report = normalize::normalize_unwind(payload);
			if filter::should_ignore(&state.config.ignore_errors, &report.error_type, &report.message)
			{
				return;
			}
			if !filter::sample_passes(state.config.sample_rate) {
				return;
			}
			finalize(state, report, metadata)
		};
		deliver(prepared);
	}

	/// Replaces the user identity map.
	pub fn set_user(&self, user: Map<String, Value>) {
		let mut guard = self.inner.state.write();
		let Some(state) = guard.as_mut() else {
			warn!("faultline not initialized, call init() first");
			return;
		};
		state.config.user = user;
	}

	/// Merges tags into the configured tag map; new values win on collision.
	pub fn set_tags(&self, tags: HashMap<String, String>) {
		let mut guard = self.inner.state.write();
		let Some(state) = guard.as_mut() else {
			warn!("faultline not initialized, call init() first");
			return;
		};
		state.config.tags.extend(tags);
	}

	/// Merges metadata into the configured map; new values win on collision.
	pub fn set_metadata(&self, metadata: Map<String, Value>) {
		let mut guard = self.inner.state.write();
		let Some(state) = guard.as_mut() else {
			warn!("faultline not initialized, call init() first");
			return;
		};
		state.config.metadata.extend(metadata);
	}

	/// Enables or disables capture at runtime.
	pub fn set_enabled(&self, enabled: bool) {
		let mut guard = self.inner.state.write();
		let Some(state) = guard.as_mut() else {
			warn!("faultline not initialized, call init() first");
			return;
		};
		state.config.enabled = enabled;
	}
}

impl Default for Tracker {
	fn default() -> Self {
		Self::new()
	}
}

/// Resolves the state for a capture; logs and yields `None` when the tracker
/// is uninitialized, silently yields `None` when disabled.
fn active_state<'a>(guard: &'a Option<State>) -> Option<&'a State> {
	match guard {
		None => {
			warn!("faultline not initialized, call init() first");
			None
		}
		Some(state) if !state.config.enabled => None,
		Some(state) => Some(state),
	}
}

/// Enriches the report with context and runs the `before_send` hook.
///
/// Returns the transport handle with the finalized report so delivery can
/// happen after the state lock is released.
fn finalize(
	state: &State,
	mut report: ErrorReport,
	metadata: Option<Map<String, Value>>,
) -> Option<(Arc<dyn Transport>, ErrorReport)> {
	report.metadata = context::collect(&state.config, state.framework.as_deref(), metadata);

	let report = match &state.config.before_send {
		Some(hook) => {
			match std::panic::catch_unwind(AssertUnwindSafe(|| hook(report.clone()))) {
				Ok(Some(rewritten)) => rewritten,
				Ok(None) => {
					debug!("report dropped by before_send hook");
					return None;
				}
				Err(_) => {
					// The user hook must never mask the capture itself.
					warn!("before_send hook panicked, delivering unmodified report");
					report
				}
			}
		}
		None => report,
	};

	Some((Arc::clone(&state.transport), report))
}

/// Hands the finalized report to the delivery collaborator. Failures are
/// logged and swallowed; they never propagate to the host.
fn deliver(prepared: Option<(Arc<dyn Transport>, ErrorReport)>) {
	let Some((transport, report)) = prepared else {
		return;
	};
	if let Err(error) = transport.send(&report) {
		warn!(error = %error, "failed to deliver error report");
	}
}
