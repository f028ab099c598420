// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::query::{SortColumns, Select};

/// A persisted record the [`UnitOfWork`](crate::UnitOfWork) can load and stage.
#[async_trait]
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
	/// Display name used in not-found messages, e.g. `Place`.
	const NAME: &'static str;
	const TABLE: &'static str;
	/// Qualified primary key column as it appears in [`Entity::select`].
	const ID_COLUMN: &'static str;

	fn sort_columns() -> &'static SortColumns;

	fn id(&self) -> Uuid;

	/// Base plan selecting every column [`Entity::from_row`] reads.
	fn select() -> Select;

	fn from_row(row: &PgRow) -> Result<Self>;

	/// Upsert this record and any association rows it owns.
	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error>;
}
