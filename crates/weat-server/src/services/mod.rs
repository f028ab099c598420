// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Business operations over a [`UnitOfWork`](weat_server_db::UnitOfWork).
//!
//! Services validate input, compose queries from the `weat_server_db`
//! helpers, and translate database failures into [`ServiceError`]. They never
//! see HTTP types; handlers own request parsing and response shaping.

pub mod menus;
pub mod places;
pub mod tag_types;
pub mod tags;

use uuid::Uuid;
use weat_server_api::SortParams;
use weat_server_db::{sort, DbError, Entity, Select, SortOrder, UnitOfWork};

use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("Object not found: {0}")]
	NotFound(String),

	#[error("Place with google_maps_place_id {0} already exists")]
	DuplicatePlaceId(String),

	#[error("Database validation error: {0}")]
	DatabaseValidation(String),

	#[error("Database error: {0}")]
	Db(DbError),
}

impl From<DbError> for ServiceError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(what) => ServiceError::NotFound(what),
			DbError::InvalidSortColumn(column) => {
				ServiceError::Validation(ValidationError::InvalidSortColumn(column))
			}
			DbError::Integrity { message, .. } => ServiceError::DatabaseValidation(message),
			other => ServiceError::Db(other),
		}
	}
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// An explicit ordering requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
	pub sort_by: String,
	pub order: SortOrder,
}

impl SortOptions {
	pub fn new(sort_by: impl Into<String>, order: SortOrder) -> Self {
		Self {
			sort_by: sort_by.into(),
			order,
		}
	}

	pub fn from_params(params: &SortParams) -> Option<Self> {
		params
			.sort_by
			.as_ref()
			.map(|sort_by| Self::new(sort_by.clone(), params.order))
	}
}

/// Apply `options` against `E`'s sortable columns if given, otherwise order
/// by the primary key alone.
pub(crate) fn apply_sort<E: Entity>(
	select: Select,
	options: Option<&SortOptions>,
) -> Result<Select> {
	let columns = E::sort_columns();
	match options {
		Some(options) => Ok(sort(select, columns, &options.sort_by, options.order)?),
		None => Ok(columns.tie_break(select)),
	}
}

/// Load `E` by id, failing with `NotFound("<Entity>(id=<id>)")`.
pub(crate) async fn load<E: Entity>(uow: &mut UnitOfWork, id: Uuid) -> Result<E> {
	uow.get::<E>(id)
		.await?
		.ok_or_else(|| ServiceError::NotFound(format!("{}(id={id})", E::NAME)))
}
