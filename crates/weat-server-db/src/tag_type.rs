// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{DbError, Result};
use crate::query::{Expr, Select, SortColumn, SortColumns};
use crate::types::PlaceType;

pub static TAG_TYPE_SORT_COLUMNS: SortColumns = SortColumns::new(
	"tt.id",
	&[
		("id", SortColumn::plain("tt.id")),
		("name", SortColumn::text("tt.name")),
		("place_type", SortColumn::text("tt.place_type")),
		("created_at", SortColumn::plain("tt.created_at")),
		("updated_at", SortColumn::plain("tt.updated_at")),
	],
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagType {
	pub id: Uuid,
	pub name: String,
	pub place_type: PlaceType,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl TagType {
	pub fn new(name: impl Into<String>, place_type: PlaceType) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			place_type,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn for_place_type(select: Select, place_type: PlaceType) -> Select {
		select.filter(Expr::sql("tt.place_type = ").bind(place_type.as_str()))
	}
}

#[async_trait]
impl Entity for TagType {
	const NAME: &'static str = "TagType";
	const TABLE: &'static str = "tag_types";
	const ID_COLUMN: &'static str = "tt.id";

	fn sort_columns() -> &'static SortColumns {
		&TAG_TYPE_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new(
			"SELECT tt.id, tt.name, tt.place_type, tt.created_at, tt.updated_at FROM tag_types tt",
		)
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		let place_type: String = row.try_get("place_type")?;
		Ok(Self {
			id: row.try_get("id")?,
			name: row.try_get("name")?,
			place_type: place_type.parse().map_err(DbError::Internal)?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO tag_types (id, name, place_type)
			VALUES ($1, $2, $3)
			ON CONFLICT (id) DO UPDATE SET
				name = EXCLUDED.name,
				place_type = EXCLUDED.place_type,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(&self.name)
		.bind(self.place_type.as_str())
		.execute(&mut *conn)
		.await?;

		Ok(())
	}
}
