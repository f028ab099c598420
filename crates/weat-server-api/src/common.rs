// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Types shared across endpoints.

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};
use weat_server_db::SortOrder;

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaginatedResponse<T> {
	pub items: Vec<T>,
	pub total: i64,
	pub page: i64,
	pub page_size: i64,
}

/// Query parameters for sorted listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct SortParams {
	/// Attribute to sort by. Must be one of the entity's sortable attributes.
	pub sort_by: Option<String>,
	/// `asc` (default) or `desc`.
	#[serde(default)]
	pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
	pub status: String,
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option::deserialize")]`
/// on an `Option<Option<T>>`: absent is `None`, `null` is `Some(None)`.
pub mod double_option {
	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
	where
		T: Deserialize<'de>,
		D: Deserializer<'de>,
	{
		Option::<T>::deserialize(deserializer).map(Some)
	}
}
