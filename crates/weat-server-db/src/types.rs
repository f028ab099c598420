// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
	Food,
}

impl PlaceType {
	pub fn as_str(&self) -> &'static str {
		match self {
			PlaceType::Food => "food",
		}
	}
}

impl fmt::Display for PlaceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PlaceType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"food" => Ok(PlaceType::Food),
			_ => Err(format!("unknown place type: {s}")),
		}
	}
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
	pub latitude: f64,
	pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OpeningHours {
	/// ISO weekday, 1 = Monday.
	pub day: u8,
	/// `HH:MM`, 24-hour clock.
	pub open: String,
	pub close: String,
}

/// Rectangle given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationBounds {
	pub sw_lat: f64,
	pub sw_lng: f64,
	pub ne_lat: f64,
	pub ne_lng: f64,
}

impl LocationBounds {
	pub const WORLD: LocationBounds = LocationBounds {
		sw_lat: -90.0,
		sw_lng: -180.0,
		ne_lat: 90.0,
		ne_lng: 180.0,
	};
}

impl Default for LocationBounds {
	fn default() -> Self {
		Self::WORLD
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_place_type_roundtrip_str() {
		assert_eq!("food".parse::<PlaceType>().unwrap(), PlaceType::Food);
		assert_eq!(PlaceType::Food.to_string(), "food");
		assert!("bar".parse::<PlaceType>().is_err());
	}

	#[test]
	fn test_place_type_serde_lowercase() {
		assert_eq!(serde_json::to_string(&PlaceType::Food).unwrap(), "\"food\"");
	}
}
