// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tag API types.

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;
use uuid::Uuid;
use weat_server_db::Tag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TagResponse {
	pub id: Uuid,
	pub name: String,
	pub tag_type_id: Uuid,
	pub tag_type_name: String,
}

impl From<Tag> for TagResponse {
	fn from(tag: Tag) -> Self {
		Self {
			id: tag.id,
			name: tag.name,
			tag_type_id: tag.tag_type_id,
			tag_type_name: tag.tag_type_name,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateTagRequest {
	pub name: String,
	pub tag_type_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateTagRequest {
	pub name: String,
	pub tag_type_id: Uuid,
}
