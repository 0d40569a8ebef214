// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The canonical error record built for every captured event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity of a captured event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Critical,
	Error,
	Warning,
	Info,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Critical => write!(f, "critical"),
			Self::Error => write!(f, "error"),
			Self::Warning => write!(f, "warning"),
			Self::Info => write!(f, "info"),
		}
	}
}

impl FromStr for Severity {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"critical" => Ok(Self::Critical),
			"error" => Ok(Self::Error),
			"warning" => Ok(Self::Warning),
			"info" => Ok(Self::Info),
			_ => Err(CoreError::InvalidSeverity(s.to_string())),
		}
	}
}

/// One captured error or message, as sent to the collection API.
///
/// Constructed by the normalizer, enriched with context by the pipeline,
/// optionally rewritten or dropped by the `before_send` hook, then serialized
/// for delivery and discarded. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
	pub error_type: String,
	pub message: String,
	pub stack_trace: String,
	pub severity: Severity,
	/// Basename of the source file at the error's origin, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_name: Option<String>,
	/// Fully merged context blob (system info, user identity, tags, metadata).
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub metadata: Map<String, Value>,
}

impl ErrorReport {
	/// Creates a bare report with no source location or context.
	pub fn new(
		error_type: impl Into<String>,
		message: impl Into<String>,
		stack_trace: impl Into<String>,
		severity: Severity,
	) -> Self {
		Self {
			error_type: error_type.into(),
			message: message.into(),
			stack_trace: stack_trace.into(),
			severity,
			file: None,
			line: None,
			function_name: None,
			metadata: Map::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn report_serializes_with_camel_case_keys() {
		let mut report =
			ErrorReport::new("ConnectionError", "refused", "trace", Severity::Error);
		report.file = Some("main.rs".to_string());
		report.line = Some(42);
		report.function_name = Some("handler".to_string());

		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(json["errorType"], "ConnectionError");
		assert_eq!(json["stackTrace"], "trace");
		assert_eq!(json["severity"], "error");
		assert_eq!(json["file"], "main.rs");
		assert_eq!(json["line"], 42);
		assert_eq!(json["functionName"], "handler");
	}

	#[test]
	fn report_omits_unset_optional_fields() {
		let report = ErrorReport::new("Message", "hello", "trace", Severity::Info);
		let json = serde_json::to_value(&report).unwrap();
		let obj = json.as_object().unwrap();

		assert!(!obj.contains_key("file"));
		assert!(!obj.contains_key("line"));
		assert!(!obj.contains_key("functionName"));
		assert!(!obj.contains_key("metadata"));
	}

	#[test]
	fn report_includes_non_empty_metadata() {
		let mut report = ErrorReport::new("Message", "hello", "trace", Severity::Info);
		report
			.metadata
			.insert("os".to_string(), serde_json::json!("linux"));

		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(json["metadata"]["os"], "linux");
	}

	proptest! {
		#[test]
		fn severity_roundtrip(severity in prop_oneof![
			Just(Severity::Critical),
			Just(Severity::Error),
			Just(Severity::Warning),
			Just(Severity::Info),
		]) {
			let s = severity.to_string();
			let parsed: Severity = s.parse().unwrap();
			prop_assert_eq!(severity, parsed);
		}
	}

	#[test]
	fn severity_rejects_unknown_values() {
		assert!("fatal".parse::<Severity>().is_err());
		assert!("".parse::<Severity>().is_err());
	}
}
