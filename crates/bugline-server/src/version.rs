// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for bugline-server.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"bugline-server version: {}\n\
         Git SHA:                {}\n\
         Platform:               {}-{}",
		env!("CARGO_PKG_VERSION"),
		option_env!("BUGLINE_GIT_SHA").unwrap_or("unknown"),
		std::env::consts::ARCH,
		std::env::consts::OS,
	)
}
