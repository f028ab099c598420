// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for weat-server.
//!
//! Served as JSON at `/api-docs/openapi.json` with an interactive viewer at
//! `/docs`.

use utoipa::{
	openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
	Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "weat API",
        version = "1.0.0",
        description = "Directory of places with tags and menus, bounding-box browsing and fuzzy search.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health checks"),
        (name = "places", description = "Browse, search and fetch places"),
        (name = "menus", description = "Menus, dish categories and dishes of a place"),
        (name = "tags", description = "Tags grouped by place type"),
        (name = "tag-types", description = "Tag categories grouped by place type"),
        (name = "admin", description = "Place, tag and tag type management (admin group only)")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::places::list_places,
        crate::routes::places::get_place,
        crate::routes::places::create_place,
        crate::routes::places::update_place,
        crate::routes::places::delete_place,
        crate::routes::menus::list_menus,
        crate::routes::tags::list_tags,
        crate::routes::tags::create_tag,
        crate::routes::tags::update_tag,
        crate::routes::tags::delete_tag,
        crate::routes::tag_types::list_tag_types,
        crate::routes::tag_types::create_tag_type,
        crate::routes::tag_types::update_tag_type,
        crate::routes::tag_types::delete_tag_type,
    ),
    components(
        schemas(
            weat_server_api::PlaceResponse,
            weat_server_api::CreatePlaceRequest,
            weat_server_api::UpdatePlaceRequest,
            weat_server_api::TagResponse,
            weat_server_api::CreateTagRequest,
            weat_server_api::UpdateTagRequest,
            weat_server_api::TagTypeResponse,
            weat_server_api::CreateTagTypeRequest,
            weat_server_api::UpdateTagTypeRequest,
            weat_server_api::MenuResponse,
            weat_server_api::DishCategoryResponse,
            weat_server_api::DishResponse,
            weat_server_api::HealthResponse,
            weat_server_db::Location,
            weat_server_db::OpeningHours,
            weat_server_db::PlaceType,
            weat_server_db::SortOrder,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by admin endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"bearer_auth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("JWT")
					.build(),
			),
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_openapi_spec_has_tags() {
		let json = serde_json::to_string(&ApiDoc::openapi()).expect("should serialize");
		for tag in ["health", "places", "menus", "tags", "tag-types", "admin"] {
			assert!(json.contains(tag), "Missing tag: {tag}");
		}
	}

	#[test]
	fn test_openapi_spec_has_documented_paths() {
		let spec = ApiDoc::openapi();
		let json = serde_json::to_string(&spec).expect("should serialize");

		let expected_paths = [
			"/health",
			"/places/",
			"/places/{id}",
			"/places/{id}/menus",
			"/tags/{place_type}",
			"/tag-types/{place_type}",
			"/admin/places/",
			"/admin/places/{id}",
			"/admin/tags/{id}",
			"/admin/tag-types/{id}",
		];
		for path in expected_paths {
			assert!(json.contains(path), "Missing path: {path}");
		}
		assert!(json.contains("bearer_auth"));
		assert!(json.contains("MenuResponse"));
	}
}
