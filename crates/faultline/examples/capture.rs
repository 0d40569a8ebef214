// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: capture errors and messages with the faultline SDK.
//!
//! Run with:
//!   FAULTLINE_API_KEY=... cargo run --example capture -p faultline

use std::collections::HashMap;

use faultline::{Options, Severity};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "faultline=debug".into()),
		)
		.init();

	let api_key =
		std::env::var("FAULTLINE_API_KEY").expect("FAULTLINE_API_KEY environment variable required");
	let api_url = std::env::var("FAULTLINE_API_URL")
		.unwrap_or_else(|_| "http://localhost:3000/api".to_string());

	println!("Initializing faultline...");
	println!("  API URL: {}", api_url);

	faultline::init(
		Options::new()
			.api_key(api_key)
			.api_url(api_url)
			.environment("development")
			.release("0.1.0-example")
			.ignore_error("connection reset"),
	)?;

	let mut user = serde_json::Map::new();
	user.insert("id".to_string(), json!("user_example_123"));
	user.insert("username".to_string(), json!("example_user"));
	faultline::set_user(user);

	faultline::set_tags(HashMap::from([(
		"example".to_string(),
		"true".to_string(),
	)]));

	// Explicit error capture.
	let error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "upstream refused");
	println!("Capturing an error...");
	faultline::capture_error(&error);

	// Explicit message capture with call-site metadata.
	let mut metadata = serde_json::Map::new();
	metadata.insert("step".to_string(), json!("example"));
	println!("Capturing a message...");
	faultline::capture_message_with("example run finished", Severity::Info, Some(metadata));

	// An unhandled panic would also be reported via the installed hook:
	//   panic!("this would be captured and re-reported");

	println!("Done.");
	Ok(())
}
