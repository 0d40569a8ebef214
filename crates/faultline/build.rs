// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

fn main() -> shadow_rs::SdResult<()> {
	shadow_rs::new()
}
