// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dishes and their prices.
//!
//! Prices are stored as `NUMERIC(10, 2)` and carried in Rust as whole cents,
//! so no floating point is involved between the API and the column.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{DbError, Result};
use crate::query::{Expr, Select, SortColumn, SortColumns};

pub static DISH_SORT_COLUMNS: SortColumns = SortColumns::new(
	"d.id",
	&[
		("id", SortColumn::plain("d.id")),
		("name", SortColumn::text("d.name")),
		("name_zh", SortColumn::text("d.name_zh")),
		("price", SortColumn::plain("d.price")),
		("created_at", SortColumn::plain("d.created_at")),
	],
);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
	#[error("Invalid price: {0:?}. Expected a non-negative amount with at most two decimal places.")]
	Malformed(String),

	#[error("Invalid price: {0}. Price must not exceed 99999999.99.")]
	OutOfRange(String),
}

/// A non-negative amount with two decimal places, held as cents.
///
/// Serialized as a decimal string (`"29.99"`) to keep the exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(i64);

impl Price {
	/// Largest value a `NUMERIC(10, 2)` column holds.
	pub const MAX_CENTS: i64 = 9_999_999_999;

	pub fn from_cents(cents: i64) -> std::result::Result<Self, PriceError> {
		if cents < 0 {
			return Err(PriceError::Malformed(cents.to_string()));
		}
		if cents > Self::MAX_CENTS {
			return Err(PriceError::OutOfRange(Self(cents).to_string()));
		}
		Ok(Self(cents))
	}

	pub fn cents(self) -> i64 {
		self.0
	}
}

impl fmt::Display for Price {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
	}
}

impl FromStr for Price {
	type Err = PriceError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let malformed = || PriceError::Malformed(s.to_string());
		let (whole, frac) = match s.split_once('.') {
			Some((_, "")) => return Err(malformed()),
			Some((whole, frac)) => (whole, frac),
			None => (s, ""),
		};
		let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
		if whole.is_empty() || !digits(whole) || frac.len() > 2 || !digits(frac) {
			return Err(malformed());
		}

		let whole = whole.trim_start_matches('0');
		if whole.len() > 8 {
			return Err(PriceError::OutOfRange(s.to_string()));
		}
		let whole: i64 = if whole.is_empty() {
			0
		} else {
			whole.parse().map_err(|_| malformed())?
		};
		let frac: i64 = match frac.len() {
			0 => 0,
			1 => frac.parse::<i64>().map_err(|_| malformed())? * 10,
			_ => frac.parse().map_err(|_| malformed())?,
		};
		Self::from_cents(whole * 100 + frac)
	}
}

impl TryFrom<String> for Price {
	type Error = PriceError;

	fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<Price> for String {
	fn from(price: Price) -> Self {
		price.to_string()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
	pub id: Uuid,
	pub menu_id: Uuid,
	/// Cleared when the category is deleted; the dish stays on the menu.
	pub category_id: Option<Uuid>,
	pub name: String,
	pub name_zh: String,
	pub price: Price,
	pub properties: Map<String, JsonValue>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Dish {
	pub fn new(
		menu_id: Uuid,
		name: impl Into<String>,
		name_zh: impl Into<String>,
		price: Price,
	) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			menu_id,
			category_id: None,
			name: name.into(),
			name_zh: name_zh.into(),
			price,
			properties: Map::new(),
			created_at: now,
			updated_at: now,
		}
	}

	pub fn for_menus(select: Select, menu_ids: Vec<Uuid>) -> Select {
		select.filter(Expr::sql("d.menu_id = ANY(").bind(menu_ids).push_sql(")"))
	}
}

#[async_trait]
impl Entity for Dish {
	const NAME: &'static str = "Dish";
	const TABLE: &'static str = "dishes";
	const ID_COLUMN: &'static str = "d.id";

	fn sort_columns() -> &'static SortColumns {
		&DISH_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new(
			"SELECT d.id, d.menu_id, d.category_id, d.name, d.name_zh, \
			 ROUND(d.price * 100)::bigint AS price_cents, d.properties, \
			 d.created_at, d.updated_at FROM dishes d",
		)
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		let cents: i64 = row.try_get("price_cents")?;
		let Json(properties): Json<Map<String, JsonValue>> = row.try_get("properties")?;
		Ok(Self {
			id: row.try_get("id")?,
			menu_id: row.try_get("menu_id")?,
			category_id: row.try_get("category_id")?,
			name: row.try_get("name")?,
			name_zh: row.try_get("name_zh")?,
			price: Price::from_cents(cents).map_err(|e| DbError::Internal(e.to_string()))?,
			properties,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO dishes (id, menu_id, category_id, name, name_zh, price, properties)
			VALUES ($1, $2, $3, $4, $5, $6::int8::numeric / 100, $7)
			ON CONFLICT (id) DO UPDATE SET
				menu_id = EXCLUDED.menu_id,
				category_id = EXCLUDED.category_id,
				name = EXCLUDED.name,
				name_zh = EXCLUDED.name_zh,
				price = EXCLUDED.price,
				properties = EXCLUDED.properties,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(self.menu_id)
		.bind(self.category_id)
		.bind(&self.name)
		.bind(&self.name_zh)
		.bind(self.price.cents())
		.bind(Json(&self.properties))
		.execute(&mut *conn)
		.await?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_price_parses_decimal_strings() {
		assert_eq!("29.99".parse::<Price>().unwrap().cents(), 2999);
		assert_eq!("29.9".parse::<Price>().unwrap().cents(), 2990);
		assert_eq!("29".parse::<Price>().unwrap().cents(), 2900);
		assert_eq!("0.05".parse::<Price>().unwrap().cents(), 5);
		assert_eq!("007.50".parse::<Price>().unwrap().to_string(), "7.50");
	}

	#[test]
	fn test_price_rejects_malformed_input() {
		for input in ["", ".5", "29.", "29.999", "-1", "1e3", "2 9", "29,99", "+3"] {
			assert_eq!(
				input.parse::<Price>(),
				Err(PriceError::Malformed(input.to_string())),
				"{input}"
			);
		}
	}

	#[test]
	fn test_price_range_matches_column() {
		assert_eq!(
			"99999999.99".parse::<Price>().unwrap().cents(),
			Price::MAX_CENTS
		);
		assert!(matches!(
			"100000000".parse::<Price>(),
			Err(PriceError::OutOfRange(_))
		));
		assert!(Price::from_cents(-1).is_err());
	}

	#[test]
	fn test_price_serializes_as_string() {
		let price: Price = serde_json::from_value(serde_json::json!("29.99")).unwrap();
		assert_eq!(serde_json::to_value(price).unwrap(), serde_json::json!("29.99"));
		assert!(serde_json::from_value::<Price>(serde_json::json!(29.99)).is_err());
	}

	#[test]
	fn test_select_reads_price_as_cents() {
		let sql = Dish::for_menus(Dish::select(), vec![Uuid::nil()]).to_sql();
		assert!(sql.contains("ROUND(d.price * 100)::bigint AS price_cents"));
		assert!(sql.ends_with("FROM dishes d WHERE d.menu_id = ANY($1)"));
	}

	proptest! {
		#[test]
		fn display_parses_back(cents in 0i64..=Price::MAX_CENTS) {
			let price = Price::from_cents(cents).unwrap();
			prop_assert_eq!(price.to_string().parse::<Price>(), Ok(price));
		}
	}
}
