// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Menus and the dish categories grouping their dishes.
//!
//! A place may carry several menus. Deleting a place deletes its menus, and
//! deleting a menu deletes its categories and dishes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::Result;
use crate::query::{Expr, Select, SortColumn, SortColumns};

pub static MENU_SORT_COLUMNS: SortColumns = SortColumns::new(
	"m.id",
	&[
		("id", SortColumn::plain("m.id")),
		("created_at", SortColumn::plain("m.created_at")),
		("updated_at", SortColumn::plain("m.updated_at")),
	],
);

pub static DISH_CATEGORY_SORT_COLUMNS: SortColumns = SortColumns::new(
	"dc.id",
	&[
		("id", SortColumn::plain("dc.id")),
		("name", SortColumn::text("dc.name")),
		("name_zh", SortColumn::text("dc.name_zh")),
		("created_at", SortColumn::plain("dc.created_at")),
	],
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
	pub id: Uuid,
	pub place_id: Uuid,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Menu {
	pub fn new(place_id: Uuid) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			place_id,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn for_place(select: Select, place_id: Uuid) -> Select {
		select.filter(Expr::sql("m.place_id = ").bind(place_id))
	}
}

#[async_trait]
impl Entity for Menu {
	const NAME: &'static str = "Menu";
	const TABLE: &'static str = "menus";
	const ID_COLUMN: &'static str = "m.id";

	fn sort_columns() -> &'static SortColumns {
		&MENU_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new("SELECT m.id, m.place_id, m.created_at, m.updated_at FROM menus m")
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		Ok(Self {
			id: row.try_get("id")?,
			place_id: row.try_get("place_id")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO menus (id, place_id)
			VALUES ($1, $2)
			ON CONFLICT (id) DO UPDATE SET
				place_id = EXCLUDED.place_id,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(self.place_id)
		.execute(&mut *conn)
		.await?;

		Ok(())
	}
}

/// A named section of a menu, e.g. "Main Course" / "主菜".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishCategory {
	pub id: Uuid,
	pub menu_id: Uuid,
	pub name: String,
	pub name_zh: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl DishCategory {
	pub fn new(menu_id: Uuid, name: impl Into<String>, name_zh: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			menu_id,
			name: name.into(),
			name_zh: name_zh.into(),
			created_at: now,
			updated_at: now,
		}
	}

	pub fn for_menus(select: Select, menu_ids: Vec<Uuid>) -> Select {
		select.filter(Expr::sql("dc.menu_id = ANY(").bind(menu_ids).push_sql(")"))
	}
}

#[async_trait]
impl Entity for DishCategory {
	const NAME: &'static str = "DishCategory";
	const TABLE: &'static str = "dish_categories";
	const ID_COLUMN: &'static str = "dc.id";

	fn sort_columns() -> &'static SortColumns {
		&DISH_CATEGORY_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new(
			"SELECT dc.id, dc.menu_id, dc.name, dc.name_zh, dc.created_at, dc.updated_at \
			 FROM dish_categories dc",
		)
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		Ok(Self {
			id: row.try_get("id")?,
			menu_id: row.try_get("menu_id")?,
			name: row.try_get("name")?,
			name_zh: row.try_get("name_zh")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO dish_categories (id, menu_id, name, name_zh)
			VALUES ($1, $2, $3, $4)
			ON CONFLICT (id) DO UPDATE SET
				menu_id = EXCLUDED.menu_id,
				name = EXCLUDED.name,
				name_zh = EXCLUDED.name_zh,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(self.menu_id)
		.bind(&self.name)
		.bind(&self.name_zh)
		.execute(&mut *conn)
		.await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_menus_filter_by_place() {
		let sql = Menu::for_place(Menu::select(), Uuid::nil()).to_sql();
		assert!(sql.ends_with("FROM menus m WHERE m.place_id = $1"));
	}

	#[test]
	fn test_categories_filter_by_menu_ids() {
		let sql = DishCategory::for_menus(DishCategory::select(), vec![Uuid::nil()]).to_sql();
		assert!(sql.ends_with("FROM dish_categories dc WHERE dc.menu_id = ANY($1)"));
	}
}
