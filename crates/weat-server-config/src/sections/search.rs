// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Place search configuration section.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfigLayer {
	#[serde(default)]
	pub similarity_threshold: Option<f64>,
}

impl SearchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.similarity_threshold.is_some() {
			self.similarity_threshold = other.similarity_threshold;
		}
	}

	pub fn finalize(self) -> Result<SearchConfig, ConfigError> {
		let similarity_threshold = self
			.similarity_threshold
			.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);

		if !(0.0..=1.0).contains(&similarity_threshold) {
			return Err(ConfigError::InvalidValue {
				key: "search.similarity_threshold".to_string(),
				message: format!("{similarity_threshold} is outside 0.0..=1.0"),
			});
		}

		Ok(SearchConfig {
			similarity_threshold,
		})
	}
}

/// Trigram search tuning. Lower thresholds match more loosely.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
	pub similarity_threshold: f64,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_default_threshold() {
		let config = SearchConfigLayer::default().finalize().unwrap();
		assert_eq!(config.similarity_threshold, 0.3);
	}

	#[test]
	fn test_deserialize_partial() {
		let layer: SearchConfigLayer = toml::from_str("similarity_threshold = 0.45").unwrap();
		assert_eq!(layer.similarity_threshold, Some(0.45));
	}

	proptest! {
		#[test]
		fn thresholds_in_range_are_accepted(t in 0.0f64..=1.0) {
			let layer = SearchConfigLayer { similarity_threshold: Some(t) };
			prop_assert_eq!(layer.finalize().unwrap().similarity_threshold, t);
		}

		#[test]
		fn thresholds_above_one_are_rejected(t in 1.0001f64..100.0) {
			let layer = SearchConfigLayer { similarity_threshold: Some(t) };
			prop_assert!(layer.finalize().is_err());
		}

		#[test]
		fn negative_thresholds_are_rejected(t in -100.0f64..-0.0001) {
			let layer = SearchConfigLayer { similarity_threshold: Some(t) };
			prop_assert!(layer.finalize().is_err());
		}
	}
}
