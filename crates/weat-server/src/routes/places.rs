// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Place HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use uuid::Uuid;
use weat_server_api::{
	CreatePlaceRequest, ListPlacesParams, PaginatedResponse, PlaceResponse, UpdatePlaceRequest,
};
use weat_server_db::UnitOfWork;

use crate::{
	api::AppState,
	error::ServerError,
	services::{self, places::ListPlacesOptions, SortOptions},
	validation::validate_page,
};

#[utoipa::path(
    get,
    path = "/places/",
    params(ListPlacesParams),
    responses(
        (status = 200, description = "One page of places", body = PaginatedResponse<PlaceResponse>),
        (status = 400, description = "Invalid bounds, sort column or page", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "places"
)]
#[axum::debug_handler]
pub async fn list_places(
	State(state): State<AppState>,
	Query(params): Query<ListPlacesParams>,
) -> Result<impl IntoResponse, ServerError> {
	let page = validate_page(params.page, params.page_size)?;
	let options = ListPlacesOptions {
		bounds: params.bounds(),
		sort: params
			.sort_by
			.as_ref()
			.map(|sort_by| SortOptions::new(sort_by.clone(), params.order)),
		filter: params.query().map(str::to_string),
		page: Some(page),
	};

	let mut uow = UnitOfWork::new(state.pool.clone());
	let listing =
		services::places::list_places(&mut uow, &options, state.similarity_threshold).await?;
	let (items, total) = listing.into_parts();

	Ok(Json(PaginatedResponse {
		items: items.into_iter().map(PlaceResponse::from).collect(),
		total,
		page: params.page,
		page_size: params.page_size,
	}))
}

#[utoipa::path(
    get,
    path = "/places/{id}",
    params(
        ("id" = Uuid, Path, description = "Place ID")
    ),
    responses(
        (status = 200, description = "Place found", body = PlaceResponse),
        (status = 404, description = "Place not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "places"
)]
#[axum::debug_handler]
pub async fn get_place(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let place = services::places::get_place(&mut uow, id).await?;
	Ok(Json(PlaceResponse::from(place)))
}

#[utoipa::path(
    post,
    path = "/admin/places/",
    request_body = CreatePlaceRequest,
    responses(
        (status = 201, description = "Place created", body = PlaceResponse),
        (status = 400, description = "Invalid request or unknown tag ids", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 409, description = "Google Maps place id already used", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn create_place(
	State(state): State<AppState>,
	Json(request): Json<CreatePlaceRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let place = services::places::create_place(&mut uow, request).await?;
	Ok((StatusCode::CREATED, Json(PlaceResponse::from(place))))
}

#[utoipa::path(
    put,
    path = "/admin/places/{id}",
    params(
        ("id" = Uuid, Path, description = "Place ID")
    ),
    request_body = UpdatePlaceRequest,
    responses(
        (status = 200, description = "Place updated", body = PlaceResponse),
        (status = 400, description = "Invalid request or unknown tag ids", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Place not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Google Maps place id already used", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn update_place(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(request): Json<UpdatePlaceRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let place = services::places::update_place(&mut uow, id, request).await?;
	Ok(Json(PlaceResponse::from(place)))
}

#[utoipa::path(
    delete,
    path = "/admin/places/{id}",
    params(
        ("id" = Uuid, Path, description = "Place ID")
    ),
    responses(
        (status = 204, description = "Place deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin user", body = crate::error::ErrorResponse),
        (status = 404, description = "Place not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[axum::debug_handler]
pub async fn delete_place(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	services::places::delete_place(&mut uow, id).await?;
	Ok(StatusCode::NO_CONTENT)
}
