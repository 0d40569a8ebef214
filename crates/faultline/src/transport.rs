// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of finalized reports to the collection API.
//!
//! The pipeline only needs a `deliver(report) -> success/failure` capability;
//! [`Transport`] is that seam. The default [`HttpTransport`] posts one JSON
//! request per report with a short hard timeout, so a capture call can never
//! block its caller for long. There is no queueing and no retry; a failed
//! delivery is a dropped report.

use std::time::Duration;

use faultline_core::ErrorReport;
use tracing::debug;

use crate::error::{Result, SdkError};

/// Hard upper bound on how long one delivery may block the capturing thread.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery collaborator for finalized reports.
pub trait Transport: Send + Sync {
	/// Delivers one report. Failures are swallowed by the pipeline.
	fn send(&self, report: &ErrorReport) -> Result<()>;
}

/// Default transport: blocking HTTP POST to `{api_url}/errors/report`.
pub struct HttpTransport {
	endpoint: String,
	api_key: String,
	client: reqwest::blocking::Client,
}

impl HttpTransport {
	/// Builds the transport for a normalized API base URL.
	pub fn new(api_url: &str, api_key: impl Into<String>) -> Result<Self> {
		let client = reqwest::blocking::Client::builder()
			.user_agent(user_agent())
			.timeout(DELIVERY_TIMEOUT)
			.build()?;

		Ok(Self {
			endpoint: format!("{api_url}/errors/report"),
			api_key: api_key.into(),
			client,
		})
	}

	pub(crate) fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

impl Transport for HttpTransport {
	fn send(&self, report: &ErrorReport) -> Result<()> {
		let response = self
			.client
			.post(&self.endpoint)
			.header("Authorization", format!("Bearer {}", self.api_key))
			.json(report)
			.send()?;

		if !response.status().is_success() {
			return Err(SdkError::ServerError {
				status: response.status().as_u16(),
			});
		}

		debug!(endpoint = %self.endpoint, "error report delivered");
		Ok(())
	}
}

/// User-Agent sent with every delivery, `faultline/{version}`.
fn user_agent() -> String {
	format!("faultline/{}", crate::build::PKG_VERSION)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_appends_report_path() {
		let transport = HttpTransport::new("https://errors.example.com/api", "key").unwrap();
		assert_eq!(
			transport.endpoint(),
			"https://errors.example.com/api/errors/report"
		);
	}

	#[test]
	fn user_agent_names_the_sdk() {
		let ua = user_agent();
		assert!(ua.starts_with("faultline/"));
	}
}
