// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::Result;
use crate::query::{Expr, Select, SortColumn, SortColumns};
use crate::types::PlaceType;

pub static TAG_SORT_COLUMNS: SortColumns = SortColumns::new(
	"t.id",
	&[
		("id", SortColumn::plain("t.id")),
		("name", SortColumn::text("t.name")),
		("tag_type_id", SortColumn::plain("t.tag_type_id")),
		("tag_type_name", SortColumn::text("tt.name")),
		("created_at", SortColumn::plain("t.created_at")),
		("updated_at", SortColumn::plain("t.updated_at")),
	],
);

/// A tag together with the name of its tag type.
///
/// Also the element type of the aggregated `tags` column on places, hence
/// `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub id: Uuid,
	pub name: String,
	pub tag_type_id: Uuid,
	/// Read-only; derived from the tag type at load time.
	#[serde(default)]
	pub tag_type_name: String,
}

impl Tag {
	pub fn new(name: impl Into<String>, tag_type_id: Uuid) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			tag_type_id,
			tag_type_name: String::new(),
		}
	}

	pub fn for_place_type(select: Select, place_type: PlaceType) -> Select {
		select.filter(Expr::sql("tt.place_type = ").bind(place_type.as_str()))
	}

	pub fn with_ids(select: Select, ids: Vec<Uuid>) -> Select {
		select.filter(Expr::sql("t.id = ANY(").bind(ids).push_sql(")"))
	}
}

#[async_trait]
impl Entity for Tag {
	const NAME: &'static str = "Tag";
	const TABLE: &'static str = "tags";
	const ID_COLUMN: &'static str = "t.id";

	fn sort_columns() -> &'static SortColumns {
		&TAG_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new(
			"SELECT t.id, t.name, t.tag_type_id, tt.name AS tag_type_name \
			 FROM tags t JOIN tag_types tt ON tt.id = t.tag_type_id",
		)
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		Ok(Self {
			id: row.try_get("id")?,
			name: row.try_get("name")?,
			tag_type_id: row.try_get("tag_type_id")?,
			tag_type_name: row.try_get("tag_type_name")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO tags (id, name, tag_type_id)
			VALUES ($1, $2, $3)
			ON CONFLICT (id) DO UPDATE SET
				name = EXCLUDED.name,
				tag_type_id = EXCLUDED.tag_type_id,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(&self.name)
		.bind(self.tag_type_id)
		.execute(&mut *conn)
		.await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_select_joins_tag_type() {
		let sql = Tag::select().to_sql();
		assert!(sql.contains("JOIN tag_types tt ON tt.id = t.tag_type_id"));
		assert!(sql.contains("tt.name AS tag_type_name"));
	}

	#[test]
	fn test_with_ids_uses_any() {
		let sql = Tag::with_ids(Tag::select(), vec![Uuid::new_v4()]).to_sql();
		assert!(sql.ends_with("WHERE t.id = ANY($1)"));
	}

	#[test]
	fn test_tag_type_name_sorts_by_joined_column() {
		let column = TAG_SORT_COLUMNS.get("tag_type_name").unwrap();
		assert_eq!(column.expr, "tt.name");
		assert!(column.text);
	}

	#[test]
	fn test_deserialize_aggregated_element() {
		let tag: Tag = serde_json::from_value(serde_json::json!({
			"id": "00000000-0000-0000-0000-000000000001",
			"name": "Ramen",
			"tag_type_id": "00000000-0000-0000-0000-000000000002",
			"tag_type_name": "Cuisine"
		}))
		.unwrap();
		assert_eq!(tag.name, "Ramen");
		assert_eq!(tag.tag_type_name, "Cuisine");
	}
}
