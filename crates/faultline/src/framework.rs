// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Best-effort web framework detection.
//!
//! A fixed, ordered probe list checked once during `init`; the result is
//! cached in tracker state and never re-probed per capture. Probes look for
//! environment markers the frameworks themselves set, so detection is
//! best-effort: an explicit `Options::framework` override always wins.

/// One detection probe. First match in [`PROBES`] wins.
struct Probe {
	name: &'static str,
	detect: fn() -> bool,
}

const PROBES: &[Probe] = &[
	Probe {
		name: "rocket",
		detect: rocket_present,
	},
	Probe {
		name: "shuttle",
		detect: shuttle_present,
	},
	Probe {
		name: "actix-web",
		detect: actix_present,
	},
];

fn rocket_present() -> bool {
	std::env::var_os("ROCKET_PROFILE").is_some() || std::env::var_os("ROCKET_CONFIG").is_some()
}

fn shuttle_present() -> bool {
	std::env::var_os("SHUTTLE_PROJECT_NAME").is_some()
}

fn actix_present() -> bool {
	std::env::var_os("ACTIX_THREADPOOL").is_some()
}

/// Runs the probe list in priority order; `None` when nothing matches.
pub(crate) fn detect() -> Option<String> {
	PROBES
		.iter()
		.find(|probe| (probe.detect)())
		.map(|probe| probe.name.to_string())
}
