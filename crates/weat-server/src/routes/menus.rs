// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Path, State},
	response::IntoResponse,
	Json,
};
use uuid::Uuid;
use weat_server_api::MenuResponse;
use weat_server_db::UnitOfWork;

use crate::{api::AppState, error::ServerError, services};

#[utoipa::path(
    get,
    path = "/places/{id}/menus",
    params(
        ("id" = Uuid, Path, description = "Place ID")
    ),
    responses(
        (status = 200, description = "Menus of the place, oldest first", body = Vec<MenuResponse>),
        (status = 404, description = "Place not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "menus"
)]
#[axum::debug_handler]
pub async fn list_menus(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
	let mut uow = UnitOfWork::new(state.pool.clone());
	let menus = services::menus::list_menus(&mut uow, id).await?;
	Ok(Json(
		menus
			.into_iter()
			.map(|detail| MenuResponse::new(detail.menu, detail.categories, detail.dishes))
			.collect::<Vec<_>>(),
	))
}
