// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input validation for API handlers and services.
//!
//! Every check returns a [`ValidationError`] whose message names the offending
//! value. Handlers surface these as `400 Bad Request`.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;
use weat_server_db::{Location, LocationBounds, OpeningHours, Page};

static PHONE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
	#[error("Invalid latitude: {field}={value}. Latitude must be between -90 and 90 degrees.")]
	InvalidLatitude { field: &'static str, value: f64 },

	#[error("Invalid longitude: {field}={value}. Longitude must be between -180 and 180 degrees.")]
	InvalidLongitude { field: &'static str, value: f64 },

	/// `low` is the south-west edge of the inverted axis, `high` the north-east.
	#[error(
		"Invalid bounds: {low_field}={low} exceeds {high_field}={high}. Southwest corner must not exceed northeast corner."
	)]
	InvalidBounds {
		low_field: &'static str,
		low: f64,
		high_field: &'static str,
		high: f64,
	},

	#[error("Invalid phone number: {0}. Phone number must be 10 digits.")]
	InvalidPhoneNumber(String),

	#[error("Invalid time format: {0}. Expected format is HH:mm.")]
	InvalidTimeFormat(String),

	#[error("Invalid time order: open time {open} must be earlier than close time {close}.")]
	InvalidTimeOrder { open: String, close: String },

	#[error("Invalid day: {0}. Day must be an integer between 1 (Monday) and 7 (Sunday).")]
	InvalidDay(u8),

	#[error("Invalid pagination: page {page}, page_size {page_size}. Both must be at least 1.")]
	InvalidPagination { page: i64, page_size: i64 },

	#[error("Invalid sort column: {0}. Sort column must be a valid attribute of the entity.")]
	InvalidSortColumn(String),

	#[error("Invalid tag ids: {}", format_ids(.0))]
	InvalidTagIds(Vec<Uuid>),

	#[error("Invalid name: must not be empty.")]
	EmptyName,
}

fn format_ids(ids: &[Uuid]) -> String {
	ids.iter()
		.map(Uuid::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// `field` names the offending input in the error.
pub fn validate_latitude(field: &'static str, latitude: f64) -> Result<(), ValidationError> {
	if (-90.0..=90.0).contains(&latitude) {
		Ok(())
	} else {
		Err(ValidationError::InvalidLatitude {
			field,
			value: latitude,
		})
	}
}

pub fn validate_longitude(field: &'static str, longitude: f64) -> Result<(), ValidationError> {
	if (-180.0..=180.0).contains(&longitude) {
		Ok(())
	} else {
		Err(ValidationError::InvalidLongitude {
			field,
			value: longitude,
		})
	}
}

pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
	validate_latitude("latitude", location.latitude)?;
	validate_longitude("longitude", location.longitude)
}

fn ordered(
	low_field: &'static str,
	low: f64,
	high_field: &'static str,
	high: f64,
) -> Result<(), ValidationError> {
	if low > high {
		return Err(ValidationError::InvalidBounds {
			low_field,
			low,
			high_field,
			high,
		});
	}
	Ok(())
}

/// Each corner must be in range and the south-west corner must not exceed
/// the north-east corner on either axis. Latitude is checked first.
pub fn validate_bounds(bounds: &LocationBounds) -> Result<(), ValidationError> {
	validate_latitude("sw_lat", bounds.sw_lat)?;
	validate_longitude("sw_lng", bounds.sw_lng)?;
	validate_latitude("ne_lat", bounds.ne_lat)?;
	validate_longitude("ne_lng", bounds.ne_lng)?;

	ordered("sw_lat", bounds.sw_lat, "ne_lat", bounds.ne_lat)?;
	ordered("sw_lng", bounds.sw_lng, "ne_lng", bounds.ne_lng)
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
	if PHONE_NUMBER_REGEX.is_match(phone_number) {
		Ok(())
	} else {
		Err(ValidationError::InvalidPhoneNumber(phone_number.to_string()))
	}
}

fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
	NaiveTime::parse_from_str(value, TIME_FORMAT)
		.map_err(|_| ValidationError::InvalidTimeFormat(value.to_string()))
}

pub fn validate_opening_hours(hours: &[OpeningHours]) -> Result<(), ValidationError> {
	for interval in hours {
		if !(1..=7).contains(&interval.day) {
			return Err(ValidationError::InvalidDay(interval.day));
		}
		let open = parse_time(&interval.open)?;
		let close = parse_time(&interval.close)?;
		if open >= close {
			return Err(ValidationError::InvalidTimeOrder {
				open: interval.open.clone(),
				close: interval.close.clone(),
			});
		}
	}
	Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
	if name.trim().is_empty() {
		Err(ValidationError::EmptyName)
	} else {
		Ok(())
	}
}

/// Convert 1-based query parameters into a [`Page`].
pub fn validate_page(page: i64, page_size: i64) -> Result<Page, ValidationError> {
	let invalid = || ValidationError::InvalidPagination { page, page_size };
	let page_no = u32::try_from(page).map_err(|_| invalid())?;
	let size = u32::try_from(page_size).map_err(|_| invalid())?;
	if page_no == 0 || size == 0 {
		return Err(invalid());
	}
	Ok(Page::new(page_no, size))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn hours(day: u8, open: &str, close: &str) -> OpeningHours {
		OpeningHours {
			day,
			open: open.to_string(),
			close: close.to_string(),
		}
	}

	#[test]
	fn test_world_bounds_are_valid() {
		assert!(validate_bounds(&LocationBounds::WORLD).is_ok());
	}

	#[test]
	fn test_inverted_bounds_rejected() {
		let bounds = LocationBounds {
			sw_lat: 10.0,
			sw_lng: 0.0,
			ne_lat: 5.0,
			ne_lng: 5.0,
		};
		let err = validate_bounds(&bounds).unwrap_err();
		assert_eq!(
			err,
			ValidationError::InvalidBounds {
				low_field: "sw_lat",
				low: 10.0,
				high_field: "ne_lat",
				high: 5.0,
			}
		);
		assert!(err.to_string().starts_with("Invalid bounds: sw_lat=10 exceeds ne_lat=5."));
	}

	#[test]
	fn test_inverted_longitude_names_axis() {
		let bounds = LocationBounds {
			sw_lng: 20.0,
			ne_lng: -20.0,
			..LocationBounds::WORLD
		};
		assert_eq!(
			validate_bounds(&bounds),
			Err(ValidationError::InvalidBounds {
				low_field: "sw_lng",
				low: 20.0,
				high_field: "ne_lng",
				high: -20.0,
			})
		);
	}

	#[test]
	fn test_out_of_range_corner_names_field() {
		let bounds = LocationBounds {
			sw_lat: -91.0,
			..LocationBounds::WORLD
		};
		assert_eq!(
			validate_bounds(&bounds),
			Err(ValidationError::InvalidLatitude {
				field: "sw_lat",
				value: -91.0
			})
		);

		let bounds = LocationBounds {
			ne_lat: 91.0,
			..LocationBounds::WORLD
		};
		assert_eq!(
			validate_bounds(&bounds),
			Err(ValidationError::InvalidLatitude {
				field: "ne_lat",
				value: 91.0
			})
		);

		let bounds = LocationBounds {
			ne_lng: 180.5,
			..LocationBounds::WORLD
		};
		let err = validate_bounds(&bounds).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Invalid longitude: ne_lng=180.5. Longitude must be between -180 and 180 degrees."
		);
	}

	#[test]
	fn test_location_names_field() {
		assert_eq!(
			validate_location(&Location {
				latitude: 0.0,
				longitude: 200.0
			}),
			Err(ValidationError::InvalidLongitude {
				field: "longitude",
				value: 200.0
			})
		);
	}

	#[test]
	fn test_degenerate_bounds_allowed() {
		let point = LocationBounds {
			sw_lat: 5.0,
			sw_lng: 5.0,
			ne_lat: 5.0,
			ne_lng: 5.0,
		};
		assert!(validate_bounds(&point).is_ok());
	}

	#[test]
	fn test_phone_number() {
		assert!(validate_phone_number("0123456789").is_ok());
		assert_eq!(
			validate_phone_number("012345678"),
			Err(ValidationError::InvalidPhoneNumber("012345678".to_string()))
		);
		assert!(validate_phone_number("01234567890").is_err());
		assert!(validate_phone_number("012-345-678").is_err());
	}

	#[test]
	fn test_opening_hours() {
		assert!(validate_opening_hours(&[hours(1, "09:00", "17:30")]).is_ok());
		assert!(validate_opening_hours(&[]).is_ok());

		assert_eq!(
			validate_opening_hours(&[hours(0, "09:00", "17:00")]),
			Err(ValidationError::InvalidDay(0))
		);
		assert_eq!(
			validate_opening_hours(&[hours(8, "09:00", "17:00")]),
			Err(ValidationError::InvalidDay(8))
		);
		assert_eq!(
			validate_opening_hours(&[hours(2, "9am", "17:00")]),
			Err(ValidationError::InvalidTimeFormat("9am".to_string()))
		);
		assert_eq!(
			validate_opening_hours(&[hours(2, "09:00", "24:00")]),
			Err(ValidationError::InvalidTimeFormat("24:00".to_string()))
		);
		assert!(matches!(
			validate_opening_hours(&[hours(3, "18:00", "18:00")]),
			Err(ValidationError::InvalidTimeOrder { .. })
		));
	}

	#[test]
	fn test_page_must_be_positive() {
		assert_eq!(validate_page(1, 10), Ok(Page::new(1, 10)));
		assert_eq!(
			validate_page(0, 10),
			Err(ValidationError::InvalidPagination {
				page: 0,
				page_size: 10
			})
		);
		assert!(validate_page(1, 0).is_err());
		assert!(validate_page(-3, 10).is_err());
		assert!(validate_page(1, i64::MAX).is_err());
	}

	#[test]
	fn test_tag_ids_message_lists_ids() {
		let id = Uuid::nil();
		let err = ValidationError::InvalidTagIds(vec![id]);
		assert_eq!(
			err.to_string(),
			"Invalid tag ids: 00000000-0000-0000-0000-000000000000"
		);
	}

	#[test]
	fn test_blank_name_rejected() {
		assert!(validate_name("Noodles").is_ok());
		assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
	}

	proptest! {
		#[test]
		fn in_range_coordinates_are_accepted(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
			let location = Location { latitude: lat, longitude: lng };
			prop_assert!(validate_location(&location).is_ok());
		}

		#[test]
		fn out_of_range_latitude_is_rejected(lat in 90.000_001f64..1e6) {
			prop_assert!(validate_latitude("sw_lat", lat).is_err());
			prop_assert!(validate_latitude("ne_lat", -lat).is_err());
		}

		#[test]
		fn ordered_corners_are_valid(
			a in -90.0f64..=90.0, b in -90.0f64..=90.0,
			c in -180.0f64..=180.0, d in -180.0f64..=180.0,
		) {
			let bounds = LocationBounds {
				sw_lat: a.min(b),
				ne_lat: a.max(b),
				sw_lng: c.min(d),
				ne_lng: c.max(d),
			};
			prop_assert!(validate_bounds(&bounds).is_ok());
		}

		#[test]
		fn positive_pages_convert(page in 1i64..=u32::MAX as i64, size in 1i64..=1000) {
			let converted = validate_page(page, size).unwrap();
			prop_assert_eq!(i64::from(converted.page), page);
			prop_assert_eq!(converted.limit(), size);
		}

		#[test]
		fn valid_times_in_order_pass(open in 0u32..1439, span in 1u32..1440) {
			let close = (open + span).min(1439);
			prop_assume!(close > open);
			let fmt = |m: u32| format!("{:02}:{:02}", m / 60, m % 60);
			prop_assert!(validate_opening_hours(&[hours(1, &fmt(open), &fmt(close))]).is_ok());
		}
	}
}
