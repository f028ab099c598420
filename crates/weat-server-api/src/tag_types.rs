// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tag type API types.

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;
use uuid::Uuid;
use weat_server_db::{PlaceType, TagType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TagTypeResponse {
	pub id: Uuid,
	pub name: String,
	pub place_type: PlaceType,
}

impl From<TagType> for TagTypeResponse {
	fn from(tag_type: TagType) -> Self {
		Self {
			id: tag_type.id,
			name: tag_type.name,
			place_type: tag_type.place_type,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateTagTypeRequest {
	pub name: String,
	pub place_type: PlaceType,
}

/// The place type of a tag type is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateTagTypeRequest {
	pub name: String,
}
