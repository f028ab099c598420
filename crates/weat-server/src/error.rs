// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::ServiceError;
use crate::validation::ValidationError;

/// Server error types for request handling.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Invalid request input.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Entity not found.
	#[error("Object not found: {0}")]
	NotFound(String),

	/// A place with the same Google Maps place id exists.
	#[error("Duplicate place: {0}")]
	DuplicatePlaceId(String),

	/// A database constraint rejected the change.
	#[error("Database validation error: {0}")]
	DatabaseValidation(String),

	/// Database operation failed.
	#[error("Database error: {0}")]
	Db(#[from] weat_server_db::DbError),

	/// Missing or invalid credentials.
	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	/// Authenticated but not allowed.
	#[error("Forbidden: {0}")]
	Forbidden(String),
}

impl From<ServiceError> for ServerError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation(e) => ServerError::Validation(e),
			ServiceError::NotFound(what) => ServerError::NotFound(what),
			ServiceError::DuplicatePlaceId(id) => ServerError::DuplicatePlaceId(id),
			ServiceError::DatabaseValidation(msg) => ServerError::DatabaseValidation(msg),
			ServiceError::Db(e) => ServerError::Db(e),
		}
	}
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error_response) = match &self {
			ServerError::Validation(e) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("validation_error", e.to_string()),
			),
			ServerError::NotFound(what) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new("not_found", format!("Object not found: {what}")),
			),
			ServerError::DuplicatePlaceId(id) => (
				StatusCode::CONFLICT,
				ErrorResponse::new(
					"duplicate_place",
					format!("Place with google_maps_place_id {id} already exists"),
				),
			),
			ServerError::DatabaseValidation(msg) => {
				tracing::debug!(error = %msg, "constraint violation");
				(
					StatusCode::BAD_REQUEST,
					ErrorResponse::new("database_validation_error", msg.clone()),
				)
			}
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", "A database error occurred"),
				)
			}
			ServerError::Unauthorized(msg) => {
				tracing::warn!(reason = %msg, "unauthorized request");
				(
					StatusCode::UNAUTHORIZED,
					ErrorResponse::new("unauthorized", msg.clone()),
				)
			}
			ServerError::Forbidden(msg) => {
				tracing::warn!(reason = %msg, "forbidden request");
				(
					StatusCode::FORBIDDEN,
					ErrorResponse::new("forbidden", msg.clone()),
				)
			}
		};

		(status, Json(error_response)).into_response()
	}
}
