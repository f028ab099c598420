// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use uuid::Uuid;
use weat_server_api::{CreateTagRequest, SortParams, TagResponse, UpdateTagRequest};
use weat_server_db::{PlaceType, UnitOfWork};

use crate::{
	api::AppState,
	error::ServerError,
	services::{self, SortOptions},
};

#[utoipa::path(
    get,
    path = "/tags/{place_type}",
    params(
        ("place_type" = PlaceType, Path, description = "Place type the tags apply to"),
        SortParams
    ),
    responses(
        (status = 200, description = "Tags for the place type", body = Vec<TagResponse>),
        (status = 400, description = "Invalid sort column", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "tags"
)]
#[axum::debug_handler]
pub async fn list_tags(
	State(state): State<AppState>,
	Path(place_type): Path<PlaceType>,
	Query(params): Query<SortParams>,
) -> Result<impl IntoResponse, ServerError> {
	let sort = SortOptions::from_params(&params);
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tags = services::tags::list_tags(&mut uow, place_type, sort.as_ref()).await?;
	Ok(Json(
		tags.into_iter().map(TagResponse::from).collect::<Vec<_>>(),
	))
}

#[utoipa::path(
    post,
    path = "/admin/tags/",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid request or unknown tag type", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn create_tag(
	State(state): State<AppState>,
	Json(request): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tag = services::tags::create_tag(&mut uow, request).await?;
	Ok((StatusCode::CREATED, Json(TagResponse::from(tag))))
}

#[utoipa::path(
    put,
    path = "/admin/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Invalid request or unknown tag type", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn update_tag(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(request): Json<UpdateTagRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let tag = services::tags::update_tag(&mut uow, id, request).await?;
	Ok(Json(TagResponse::from(tag)))
}

#[utoipa::path(
    delete,
    path = "/admin/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag deleted and detached from all places"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn delete_tag(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	services::tags::delete_tag(&mut uow, id).await?;
	Ok(StatusCode::NO_CONTENT)
}
