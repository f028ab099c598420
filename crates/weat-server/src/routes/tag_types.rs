// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use uuid::Uuid;
use weat_server_api::{CreateTagTypeRequest, SortParams, TagTypeResponse, UpdateTagTypeRequest};
use weat_server_db::{PlaceType, UnitOfWork};

use crate::{
	api::AppState,
	error::ServerError,
	services::{self, SortOptions},
};

#[utoipa::path(
    get,
    path = "/tag-types/{place_type}",
    params(
        ("place_type" = PlaceType, Path, description = "Place type the tag types apply to"),
        SortParams
    ),
    responses(
        (status = 200, description = "Tag types for the place type", body = Vec<TagTypeResponse>),
        (status = 400, description = "Invalid sort column", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "tag-types"
)]
#[axum::debug_handler]
pub async fn list_tag_types(
	State(state): State<AppState>,
	Path(place_type): Path<PlaceType>,
	Query(params): Query<SortParams>,
) -> Result<impl IntoResponse, ServerError> {
	let sort = SortOptions::from_params(&params);
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tag_types =
		services::tag_types::list_tag_types(&mut uow, place_type, sort.as_ref()).await?;
	Ok(Json(
		tag_types.into_iter().map(TagTypeResponse::from).collect::<Vec<_>>(),
	))
}

#[utoipa::path(
    post,
    path = "/admin/tag-types/",
    request_body = CreateTagTypeRequest,
    responses(
        (status = 201, description = "Tag type created", body = TagTypeResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn create_tag_type(
	State(state): State<AppState>,
	Json(request): Json<CreateTagTypeRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tag_type = services::tag_types::create_tag_type(&mut uow, request).await?;
	Ok((StatusCode::CREATED, Json(TagTypeResponse::from(tag_type))))
}

#[utoipa::path(
    put,
    path = "/admin/tag-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag type ID")
    ),
    request_body = UpdateTagTypeRequest,
    responses(
        (status = 200, description = "Tag type updated", body = TagTypeResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag type not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn update_tag_type(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(request): Json<UpdateTagTypeRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tag_type = services::tag_types::update_tag_type(&mut uow, id, request).await?;
	Ok(Json(TagTypeResponse::from(tag_type)))
}

#[utoipa::path(
    delete,
    path = "/admin/tag-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag type ID")
    ),
    responses(
        (status = 204, description = "Tag type deleted"),
        (status = 400, description = "Tags still reference the tag type", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag type not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn delete_tag_type(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	services::tag_types::delete_tag_type(&mut uow, id).await?;
	Ok(StatusCode::NO_CONTENT)
}
