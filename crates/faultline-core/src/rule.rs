// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ignore rules for suppressing known-noisy errors.

use regex::Regex;

/// A configured rule that suppresses reporting of matching errors.
///
/// A `Literal` rule matches via case-insensitive substring search against the
/// error's message or its type name. A `Pattern` rule runs a regex search over
/// the error's message alone.
#[derive(Debug, Clone)]
pub enum IgnoreRule {
	Literal(String),
	Pattern(Regex),
}

impl IgnoreRule {
	/// Returns true if this rule matches the given error.
	pub fn matches(&self, error_type: &str, message: &str) -> bool {
		match self {
			Self::Literal(needle) => {
				let needle = needle.to_lowercase();
				message.to_lowercase().contains(&needle)
					|| error_type.to_lowercase().contains(&needle)
			}
			Self::Pattern(regex) => regex.is_match(message),
		}
	}
}

impl From<&str> for IgnoreRule {
	fn from(s: &str) -> Self {
		Self::Literal(s.to_string())
	}
}

impl From<String> for IgnoreRule {
	fn from(s: String) -> Self {
		Self::Literal(s)
	}
}

impl From<Regex> for IgnoreRule {
	fn from(regex: Regex) -> Self {
		Self::Pattern(regex)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn literal_matches_message_substring_case_insensitive() {
		let rule = IgnoreRule::from("timed out");
		assert!(rule.matches("IoError", "connection Timed Out after 5s"));
		assert!(!rule.matches("IoError", "connection refused"));
	}

	#[test]
	fn literal_matches_type_name() {
		let rule = IgnoreRule::from("connectionerror");
		assert!(rule.matches("ConnectionError", "x"));
		assert!(!rule.matches("ValueError", "x"));
	}

	#[test]
	fn pattern_searches_the_message() {
		let rule = IgnoreRule::from(Regex::new(r"refused|reset").unwrap());
		assert!(rule.matches("IoError", "connection refused"));
		assert!(rule.matches("IoError", "connection reset by peer"));
		assert!(!rule.matches("IoError", "broken pipe"));
	}

	#[test]
	fn anchored_pattern_matches_the_full_message() {
		let rule = IgnoreRule::from(Regex::new(r"^connection refused$").unwrap());
		assert!(rule.matches("ConnectionError", "connection refused"));
		assert!(!rule.matches("ConnectionError", "upstream connection refused"));
	}

	#[test]
	fn pattern_does_not_see_the_type_name() {
		let rule = IgnoreRule::from(Regex::new(r"TimeoutError").unwrap());
		assert!(!rule.matches("TimeoutError", "deadline exceeded"));
		assert!(rule.matches("IoError", "TimeoutError mentioned in message"));
	}
}
