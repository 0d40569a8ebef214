// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ignore-list filtering and probabilistic sampling.
//!
//! Both checks apply to error captures only; message captures are assumed
//! intentional and bypass them entirely.

use faultline_core::IgnoreRule;

/// Returns true if any configured rule matches the error.
///
/// An empty rule list never ignores anything.
pub(crate) fn should_ignore(rules: &[IgnoreRule], error_type: &str, message: &str) -> bool {
	rules.iter().any(|rule| rule.matches(error_type, message))
}

/// One sampling decision: true means keep the report.
///
/// `rate >= 1.0` always keeps, `rate <= 0.0` always drops; in between, one
/// uniform draw in `[0, 1)` is compared against the rate.
pub(crate) fn sample_passes(rate: f64) -> bool {
	if rate >= 1.0 {
		true
	} else if rate <= 0.0 {
		false
	} else {
		rand::random::<f64>() <= rate
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_rule_list_ignores_nothing() {
		assert!(!should_ignore(&[], "ConnectionError", "refused"));
	}

	#[test]
	fn any_matching_rule_ignores() {
		let rules = vec![
			IgnoreRule::from("timeout"),
			IgnoreRule::from("ConnectionError"),
		];
		assert!(should_ignore(&rules, "app::ConnectionError", "refused"));
		assert!(should_ignore(&rules, "IoError", "read timeout"));
		assert!(!should_ignore(&rules, "ValueError", "bad input"));
	}

	#[test]
	fn sample_rate_edges_are_deterministic() {
		for _ in 0..1000 {
			assert!(sample_passes(1.0));
			assert!(!sample_passes(0.0));
		}
	}

	#[test]
	fn mid_range_rate_keeps_some_and_drops_some() {
		let kept = (0..10_000).filter(|_| sample_passes(0.5)).count();
		// A run of 10k draws at 0.5 landing outside this band is effectively
		// impossible (beyond 10 sigma).
		assert!(kept > 3_000 && kept < 7_000, "kept {kept} of 10000");
	}
}
