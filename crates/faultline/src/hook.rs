// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide panic hook installation.
//!
//! The hook chains: the previously installed hook runs first (preserving the
//! host's own top-level handling, e.g. the default stderr report), then the
//! panic is routed through the capture pipeline with severity `error`. The
//! previous hook is moved into the wrapper closure rather than read from a
//! global, and there is no uninstall; the hook lives for the process lifetime.

use tracing::info;

use crate::client::Tracker;

/// Installs the chaining panic hook for this tracker.
///
/// Idempotence is enforced by the caller's `hook_installed` flag; a tracker
/// never wraps the process hook twice.
pub(crate) fn install(tracker: Tracker) {
	let previous = std::panic::take_hook();

	std::panic::set_hook(Box::new(move |info| {
		previous(info);
		tracker.capture_panic(info);
	}));

	info!("panic hook installed");
}
