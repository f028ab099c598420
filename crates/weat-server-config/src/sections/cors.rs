// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CORS configuration section.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfigLayer {
	#[serde(default)]
	pub allow_origins: Option<Vec<String>>,
}

impl CorsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.allow_origins.is_some() {
			self.allow_origins = other.allow_origins;
		}
	}

	pub fn finalize(self) -> CorsConfig {
		let allow_origins = self
			.allow_origins
			.filter(|origins| !origins.is_empty())
			.unwrap_or_else(|| vec!["*".to_string()]);
		CorsConfig { allow_origins }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorsConfig {
	pub allow_origins: Vec<String>,
}

impl CorsConfig {
	/// True when any origin may call the API.
	pub fn allows_any_origin(&self) -> bool {
		self.allow_origins.iter().any(|origin| origin == "*")
	}
}

impl Default for CorsConfig {
	fn default() -> Self {
		CorsConfigLayer::default().finalize()
	}
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_allows_everything() {
		let config = CorsConfig::default();
		assert_eq!(config.allow_origins, vec!["*".to_string()]);
		assert!(config.allows_any_origin());
	}

	#[test]
	fn test_parse_origin_list() {
		assert_eq!(
			parse_origin_list("https://a.example, https://b.example,,"),
			vec!["https://a.example".to_string(), "https://b.example".to_string()]
		);
	}

	#[test]
	fn test_empty_list_falls_back_to_wildcard() {
		let config = CorsConfigLayer {
			allow_origins: Some(vec![]),
		}
		.finalize();
		assert!(config.allows_any_origin());
	}

	#[test]
	fn test_explicit_origins() {
		let config = CorsConfigLayer {
			allow_origins: Some(vec!["https://weat.example".to_string()]),
		}
		.finalize();
		assert!(!config.allows_any_origin());
	}
}
