// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SDK configuration and the `Options` builder passed to `init`.

use std::collections::HashMap;
use std::sync::Arc;

use faultline_core::{ErrorReport, IgnoreRule};
use serde_json::{Map, Value};

use crate::error::{Result, SdkError};
use crate::transport::Transport;

/// Default collection API base URL.
const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// User-supplied hook that can rewrite or drop a report before delivery.
///
/// Returning `None` drops the report without a delivery attempt.
pub type BeforeSend = Arc<dyn Fn(ErrorReport) -> Option<ErrorReport> + Send + Sync>;

/// Options for initializing the SDK.
///
/// Only `api_key` is required; everything else has a default.
///
/// # Example
///
/// ```ignore
/// faultline::init(
///     faultline::Options::new()
///         .api_key("fl_live_xxx")
///         .api_url("https://errors.example.com/api")
///         .environment("production")
///         .release(env!("CARGO_PKG_VERSION"))
///         .ignore_error("connection reset")
///         .sample_rate(0.5),
/// )?;
/// ```
#[derive(Clone, Default)]
pub struct Options {
	pub(crate) api_key: Option<String>,
	pub(crate) api_url: Option<String>,
	pub(crate) environment: Option<String>,
	pub(crate) release: Option<String>,
	pub(crate) enabled: Option<bool>,
	pub(crate) ignore_errors: Vec<IgnoreRule>,
	pub(crate) sample_rate: Option<f64>,
	pub(crate) user: Map<String, Value>,
	pub(crate) tags: HashMap<String, String>,
	pub(crate) metadata: Map<String, Value>,
	pub(crate) before_send: Option<BeforeSend>,
	pub(crate) framework: Option<String>,
	pub(crate) transport: Option<Arc<dyn Transport>>,
	pub(crate) auto_capture_panics: Option<bool>,
}

impl Options {
	/// Creates empty options; all fields at their defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the project API key (required).
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the collection API base URL. Trailing slashes are stripped.
	pub fn api_url(mut self, url: impl Into<String>) -> Self {
		self.api_url = Some(url.into());
		self
	}

	/// Sets the environment name, e.g. `production` or `staging`.
	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.environment = Some(env.into());
		self
	}

	/// Sets the release version, e.g. a semver string or git SHA.
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.release = Some(release.into());
		self
	}

	/// Enables or disables capture entirely. Defaults to enabled.
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = Some(enabled);
		self
	}

	/// Adds one ignore rule. Accepts a literal string or a `regex::Regex`.
	pub fn ignore_error(mut self, rule: impl Into<IgnoreRule>) -> Self {
		self.ignore_errors.push(rule.into());
		self
	}

	/// Adds a batch of ignore rules, preserving order.
	pub fn ignore_errors<I, R>(mut self, rules: I) -> Self
	where
		I: IntoIterator<Item = R>,
		R: Into<IgnoreRule>,
	{
		self.ignore_errors.extend(rules.into_iter().map(Into::into));
		self
	}

	/// Sets the sampling rate in `[0.0, 1.0]`; out-of-range values are clamped.
	///
	/// `1.0` (the default) reports everything, `0.0` reports nothing.
	pub fn sample_rate(mut self, rate: f64) -> Self {
		self.sample_rate = Some(rate.clamp(0.0, 1.0));
		self
	}

	/// Sets the initial user identity map.
	///
	/// The `id` and `username` keys, when present, are surfaced as `userId`
	/// and `userName` in report context.
	pub fn user(mut self, user: Map<String, Value>) -> Self {
		self.user = user;
		self
	}

	/// Sets one initial tag.
	pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.tags.insert(key.into(), value.into());
		self
	}

	/// Sets the initial tag map.
	pub fn tags(mut self, tags: HashMap<String, String>) -> Self {
		self.tags = tags;
		self
	}

	/// Sets the initial global metadata map.
	pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
		self.metadata = metadata;
		self
	}

	/// Sets the `before_send` hook.
	///
	/// The hook receives every enriched report and may rewrite any field.
	/// Returning `None` drops the report.
	pub fn before_send<F>(mut self, hook: F) -> Self
	where
		F: Fn(ErrorReport) -> Option<ErrorReport> + Send + Sync + 'static,
	{
		self.before_send = Some(Arc::new(hook));
		self
	}

	/// Overrides framework auto-detection with an explicit name.
	pub fn framework(mut self, name: impl Into<String>) -> Self {
		self.framework = Some(name.into());
		self
	}

	/// Overrides the delivery transport.
	///
	/// By default reports go out over HTTP; integrations and tests may
	/// substitute their own [`Transport`].
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Controls installation of the process-wide panic hook at `init`.
	///
	/// Defaults to true. Hosts that report panics through their own plumbing
	/// (e.g. request middleware only) can opt out.
	pub fn auto_capture_panics(mut self, auto: bool) -> Self {
		self.auto_capture_panics = Some(auto);
		self
	}

	/// Validates the options and splits them into the frozen config plus the
	/// init-time overrides.
	pub(crate) fn into_parts(self) -> Result<Bootstrap> {
		let api_key = match self.api_key {
			Some(key) if !key.is_empty() => key,
			_ => return Err(SdkError::MissingApiKey),
		};

		let api_url = self
			.api_url
			.unwrap_or_else(|| DEFAULT_API_URL.to_string())
			.trim_end_matches('/')
			.to_string();

		let config = Config {
			api_key,
			api_url,
			environment: self.environment,
			release: self.release,
			enabled: self.enabled.unwrap_or(true),
			ignore_errors: self.ignore_errors,
			sample_rate: self.sample_rate.unwrap_or(1.0),
			user: self.user,
			tags: self.tags,
			metadata: self.metadata,
			before_send: self.before_send,
		};

		Ok(Bootstrap {
			config,
			framework: self.framework,
			transport: self.transport,
			auto_capture_panics: self.auto_capture_panics.unwrap_or(true),
		})
	}
}

/// The validated result of `Options::into_parts`: the frozen config plus the
/// overrides only `init` consumes.
pub(crate) struct Bootstrap {
	pub(crate) config: Config,
	pub(crate) framework: Option<String>,
	pub(crate) transport: Option<Arc<dyn Transport>>,
	pub(crate) auto_capture_panics: bool,
}

/// Validated SDK configuration, frozen by `init`.
///
/// `user`, `tags`, `metadata` and `enabled` remain mutable through the
/// tracker's setters; everything else is fixed for the process lifetime.
pub(crate) struct Config {
	pub(crate) api_key: String,
	pub(crate) api_url: String,
	pub(crate) environment: Option<String>,
	pub(crate) release: Option<String>,
	pub(crate) enabled: bool,
	pub(crate) ignore_errors: Vec<IgnoreRule>,
	pub(crate) sample_rate: f64,
	pub(crate) user: Map<String, Value>,
	pub(crate) tags: HashMap<String, String>,
	pub(crate) metadata: Map<String, Value>,
	pub(crate) before_send: Option<BeforeSend>,
}
