// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error normalization: turning errors, messages and panics into reports.
//!
//! Every extraction here is best-effort: a frame that cannot be parsed is
//! skipped and a missing origin location degrades to `None`, never an error.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;

use faultline_core::{ErrorReport, Severity};
use rustc_demangle::demangle;

/// One parsed stack frame.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
	pub(crate) function: Option<String>,
	pub(crate) file: Option<String>,
	pub(crate) line: Option<u32>,
	pub(crate) in_app: bool,
}

/// Builds a report from a concrete error value.
///
/// The stack trace is captured at the call point; Rust errors do not carry
/// their own backtrace on stable.
pub(crate) fn normalize_error<E>(error: &E, severity: Severity) -> ErrorReport
where
	E: std::error::Error + ?Sized,
{
	let error_type = std::any::type_name_of_val(error).to_string();
	let message = error.to_string();
	let stack_trace = Backtrace::force_capture().to_string();

	let mut report = ErrorReport::new(error_type, message, stack_trace, severity);
	let frames = parse_frames(&report.stack_trace);
	if let Some(frame) = origin_frame(&frames) {
		report.file = frame.file.clone();
		report.line = frame.line;
		report.function_name = frame.function.clone();
	}
	report
}

/// Builds a report for an explicit message capture.
///
/// There is no underlying error object: the type is the literal `"Message"`,
/// the stack trace is the current call stack, and no origin location is set.
pub(crate) fn normalize_message(message: &str, severity: Severity) -> ErrorReport {
	ErrorReport::new(
		"Message",
		message,
		Backtrace::force_capture().to_string(),
		severity,
	)
}

/// Builds a report from a panic hook invocation.
pub(crate) fn normalize_panic(info: &PanicHookInfo<'_>) -> ErrorReport {
	let mut report = normalize_unwind(info.payload());
	if let Some(location) = info.location() {
		report.file = Some(basename(location.file()).to_string());
		report.line = Some(location.line());
	}
	report
}

/// Builds a report from a caught unwind payload (no location available).
pub(crate) fn normalize_unwind(payload: &dyn Any) -> ErrorReport {
	ErrorReport::new(
		"panic",
		panic_message(payload),
		Backtrace::force_capture().to_string(),
		Severity::Error,
	)
}

/// Extracts the human-readable message from a panic payload.
pub(crate) fn panic_message(payload: &dyn Any) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_string()
	}
}

/// Parses the display output of `std::backtrace::Backtrace` into frames.
///
/// Frame lines look like `  3: path::to::function`; each may be followed by
/// a `at /path/file.rs:line:col` location line that belongs to it.
pub(crate) fn parse_frames(stack_trace: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in stack_trace.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				if frame.file.is_none() {
					if let Some((file, lineno)) = parse_location(location) {
						frame.file = Some(file);
						frame.line = Some(lineno);
					}
				}
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Parses one `N: function` frame line.
fn parse_frame_line(line: &str) -> Option<Frame> {
	let function_part = match line.split_once(':') {
		Some((prefix, rest)) if prefix.trim().parse::<u32>().is_ok() => rest.trim(),
		_ => return None,
	};

	if function_part.is_empty() {
		return None;
	}

	// Strip the trailing `::h0123456789abcdef` hash via alternate demangling.
	let function = format!("{:#}", demangle(function_part));
	let in_app = is_in_app_frame(&function);

	Some(Frame {
		function: Some(function),
		file: None,
		line: None,
		in_app,
	})
}

/// Parses `path/file.rs:line:col` into `(basename, line)`.
fn parse_location(location: &str) -> Option<(String, u32)> {
	let mut parts = location.rsplitn(3, ':');
	let _col = parts.next()?;
	let line = parts.next()?.trim().parse().ok()?;
	let path = parts.next()?;
	Some((basename(path).to_string(), line))
}

fn basename(path: &str) -> &str {
	path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// First in-app frame of the trace, i.e. the best-effort origin point.
pub(crate) fn origin_frame(frames: &[Frame]) -> Option<&Frame> {
	frames.iter().find(|frame| frame.in_app)
}

/// Determines whether a frame is host application code rather than runtime,
/// standard library, or SDK plumbing.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"backtrace::",
		"<backtrace::",
		"faultline::",
		"<faultline::",
		"faultline_core::",
		"faultline_axum::",
		"panic_unwind::",
		"<panic_unwind::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::thread::",
		"::rt::",
		"::runtime::",
		"::sys::",
		"::sys_common::",
	];

	for prefix in SYSTEM_PREFIXES {
		if function.starts_with(prefix) {
			return false;
		}
	}

	for contains in SYSTEM_CONTAINS {
		if function.contains(contains) {
			return false;
		}
	}

	true
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE_TRACE: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:331:9
   1: faultline::normalize::normalize_error
             at ./crates/faultline/src/normalize.rs:30:21
   2: my_app::handlers::checkout
             at ./src/handlers.rs:87:13
   3: my_app::main
             at ./src/main.rs:12:5
";

	#[test]
	fn frames_pair_functions_with_locations() {
		let frames = parse_frames(SAMPLE_TRACE);
		assert_eq!(frames.len(), 4);
		assert_eq!(
			frames[2].function.as_deref(),
			Some("my_app::handlers::checkout")
		);
		assert_eq!(frames[2].file.as_deref(), Some("handlers.rs"));
		assert_eq!(frames[2].line, Some(87));
	}

	#[test]
	fn origin_is_first_in_app_frame() {
		let frames = parse_frames(SAMPLE_TRACE);
		let origin = origin_frame(&frames).unwrap();
		assert_eq!(origin.function.as_deref(), Some("my_app::handlers::checkout"));
		assert_eq!(origin.file.as_deref(), Some("handlers.rs"));
	}

	#[test]
	fn sdk_and_std_frames_are_not_in_app() {
		assert!(!is_in_app_frame("std::panicking::begin_panic"));
		assert!(!is_in_app_frame("faultline::client::Tracker::capture_error"));
		assert!(!is_in_app_frame("tokio::runtime::Runtime::block_on"));
		assert!(is_in_app_frame("my_app::main"));
	}

	#[test]
	fn location_parse_keeps_basename_only() {
		let (file, line) = parse_location("/home/user/app/src/deep/nested/mod.rs:42:7").unwrap();
		assert_eq!(file, "mod.rs");
		assert_eq!(line, 42);
	}

	#[test]
	fn unparseable_location_is_skipped() {
		assert!(parse_location("not a location").is_none());
		assert!(parse_location("file.rs:notanumber:3").is_none());
	}

	#[test]
	fn frame_line_requires_numeric_prefix() {
		assert!(parse_frame_line("7: my_app::main").is_some());
		assert!(parse_frame_line("note: run with RUST_BACKTRACE=1").is_none());
	}

	#[test]
	fn message_reports_use_fixed_type_and_no_location() {
		let report = normalize_message("deploy finished", Severity::Info);
		assert_eq!(report.error_type, "Message");
		assert_eq!(report.message, "deploy finished");
		assert!(report.file.is_none());
		assert!(report.line.is_none());
		assert!(report.function_name.is_none());
		assert!(!report.stack_trace.is_empty());
	}

	#[test]
	fn error_reports_carry_concrete_type_name() {
		let error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let report = normalize_error(&error, Severity::Error);
		assert!(report.error_type.contains("Error"));
		assert_eq!(report.message, "refused");
		assert_eq!(report.severity, Severity::Error);
	}

	#[test]
	fn panic_message_handles_common_payloads() {
		assert_eq!(panic_message(&"boom" as &dyn Any), "boom");
		assert_eq!(panic_message(&"boom".to_string() as &dyn Any), "boom");
		assert_eq!(panic_message(&42u32 as &dyn Any), "unknown panic payload");
	}
}
