// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Place API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use weat_server_db::{Location, LocationBounds, OpeningHours, Place, PlaceType, SortOrder};

use crate::common::double_option;
use crate::tags::TagResponse;

fn default_sw_lat() -> f64 {
	LocationBounds::WORLD.sw_lat
}

fn default_sw_lng() -> f64 {
	LocationBounds::WORLD.sw_lng
}

fn default_ne_lat() -> f64 {
	LocationBounds::WORLD.ne_lat
}

fn default_ne_lng() -> f64 {
	LocationBounds::WORLD.ne_lng
}

fn default_page() -> i64 {
	1
}

fn default_page_size() -> i64 {
	10
}

/// Query parameters for listing and searching places.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListPlacesParams {
	/// South-west latitude (default: -90).
	#[serde(default = "default_sw_lat")]
	pub sw_lat: f64,
	/// South-west longitude (default: -180).
	#[serde(default = "default_sw_lng")]
	pub sw_lng: f64,
	/// North-east latitude (default: 90).
	#[serde(default = "default_ne_lat")]
	pub ne_lat: f64,
	/// North-east longitude (default: 180).
	#[serde(default = "default_ne_lng")]
	pub ne_lng: f64,
	/// Attribute to sort by. Without it, search results rank by relevance.
	pub sort_by: Option<String>,
	#[serde(default)]
	pub order: SortOrder,
	/// Fuzzy search across name, Chinese name and address.
	pub q: Option<String>,
	/// Page number, 1-based (default: 1).
	#[serde(default = "default_page")]
	pub page: i64,
	/// Page size (default: 10).
	#[serde(default = "default_page_size")]
	pub page_size: i64,
}

impl ListPlacesParams {
	pub fn bounds(&self) -> LocationBounds {
		LocationBounds {
			sw_lat: self.sw_lat,
			sw_lng: self.sw_lng,
			ne_lat: self.ne_lat,
			ne_lng: self.ne_lng,
		}
	}

	/// The search text, or `None` when absent or blank.
	pub fn query(&self) -> Option<&str> {
		self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PlaceResponse {
	pub id: Uuid,
	pub name: String,
	pub name_zh: Option<String>,
	#[serde(rename = "type")]
	pub place_type: PlaceType,
	pub address: Option<String>,
	pub location: Option<Location>,
	pub google_maps_url: Option<String>,
	pub google_maps_place_id: Option<String>,
	pub phone_number: Option<String>,
	pub website_url: Option<String>,
	pub opening_hours: Vec<OpeningHours>,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub properties: Map<String, Value>,
	pub tags: Vec<TagResponse>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponse {
	fn from(place: Place) -> Self {
		Self {
			id: place.id,
			name: place.name,
			name_zh: place.name_zh,
			place_type: place.place_type,
			address: place.address,
			location: place.location,
			google_maps_url: place.google_maps_url,
			google_maps_place_id: place.google_maps_place_id,
			phone_number: place.phone_number,
			website_url: place.website_url,
			opening_hours: place.opening_hours,
			properties: place.properties,
			tags: place.tags.into_iter().map(TagResponse::from).collect(),
			created_at: place.created_at,
			updated_at: place.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreatePlaceRequest {
	pub name: String,
	pub name_zh: Option<String>,
	#[serde(rename = "type")]
	pub place_type: PlaceType,
	pub address: Option<String>,
	pub location: Option<Location>,
	pub google_maps_url: Option<String>,
	pub google_maps_place_id: Option<String>,
	/// Exactly ten digits.
	pub phone_number: Option<String>,
	pub website_url: Option<String>,
	#[serde(default)]
	pub opening_hours: Vec<OpeningHours>,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub properties: Map<String, Value>,
	/// Ids of existing tags to attach.
	#[serde(default)]
	pub tag_ids: Vec<Uuid>,
}

/// Partial update. Absent fields are left untouched; `null` clears a
/// nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdatePlaceRequest {
	pub name: Option<String>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub name_zh: Option<Option<String>>,
	#[serde(rename = "type")]
	pub place_type: Option<PlaceType>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub address: Option<Option<String>>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Location>))]
	pub location: Option<Option<Location>>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub google_maps_url: Option<Option<String>>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub google_maps_place_id: Option<Option<String>>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub phone_number: Option<Option<String>>,
	#[serde(default, deserialize_with = "double_option::deserialize")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub website_url: Option<Option<String>>,
	pub opening_hours: Option<Vec<OpeningHours>>,
	#[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
	pub properties: Option<Map<String, Value>>,
	/// When present, replaces the place's tags.
	pub tag_ids: Option<Vec<Uuid>>,
}
