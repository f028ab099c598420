// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"weat-server version: {}\n\
         Platform:            {}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_version_info_mentions_package_version() {
		let info = format_version_info();
		assert!(info.contains(env!("CARGO_PKG_VERSION")));
		assert!(info.contains(std::env::consts::OS));
	}
}
