// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report context collection.
//!
//! Builds the merged metadata blob attached to every report. Layering order,
//! later overwrites earlier on key collision:
//! base system info -> user identity -> tags (nested) -> configured metadata
//! (flattened) -> call-site metadata (flattened, highest precedence).

use serde_json::{json, Map, Value};
use sysinfo::System;

use crate::config::Config;

/// Collects the context map for one report.
pub(crate) fn collect(
	config: &Config,
	framework: Option<&str>,
	call_site: Option<Map<String, Value>>,
) -> Map<String, Value> {
	let mut context = system_context();

	if let Some(environment) = &config.environment {
		context.insert("environment".to_string(), json!(environment));
	}
	if let Some(release) = &config.release {
		context.insert("release".to_string(), json!(release));
	}
	if let Some(framework) = framework {
		context.insert("framework".to_string(), json!(framework));
	}

	if let Some(id) = config.user.get("id") {
		context.insert("userId".to_string(), id.clone());
	}
	if let Some(username) = config.user.get("username") {
		context.insert("userName".to_string(), username.clone());
	}

	if !config.tags.is_empty() {
		context.insert("tags".to_string(), json!(config.tags));
	}

	for (key, value) in &config.metadata {
		context.insert(key.clone(), value.clone());
	}

	if let Some(call_site) = call_site {
		for (key, value) in call_site {
			context.insert(key, value);
		}
	}

	context
}

/// Ambient OS and runtime information.
fn system_context() -> Map<String, Value> {
	let mut context = Map::new();

	context.insert(
		"os".to_string(),
		json!(System::name().unwrap_or_else(|| std::env::consts::OS.to_string())),
	);
	if let Some(version) = System::os_version() {
		context.insert("osVersion".to_string(), json!(version));
	}
	context.insert("rustVersion".to_string(), json!(crate::build::RUST_VERSION));

	context
}
