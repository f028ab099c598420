// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Menu API types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;
use uuid::Uuid;
use weat_server_db::{Dish, DishCategory, Menu, Price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DishResponse {
	pub id: Uuid,
	pub name: String,
	pub name_zh: String,
	/// Decimal string with two places, e.g. `"29.99"`.
	#[cfg_attr(feature = "openapi", schema(value_type = String, example = "29.99"))]
	pub price: Price,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub properties: Map<String, Value>,
}

impl From<Dish> for DishResponse {
	fn from(dish: Dish) -> Self {
		Self {
			id: dish.id,
			name: dish.name,
			name_zh: dish.name_zh,
			price: dish.price,
			properties: dish.properties,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DishCategoryResponse {
	pub id: Uuid,
	pub name: String,
	pub name_zh: String,
	pub dishes: Vec<DishResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MenuResponse {
	pub id: Uuid,
	pub place_id: Uuid,
	pub categories: Vec<DishCategoryResponse>,
	/// Dishes with no category, or whose category was deleted.
	pub uncategorized: Vec<DishResponse>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl MenuResponse {
	/// Group `dishes` under `categories`, keeping the order of both inputs.
	/// Dishes pointing at a category not in `categories` are uncategorized.
	pub fn new(menu: Menu, categories: Vec<DishCategory>, dishes: Vec<Dish>) -> Self {
		let mut by_category: HashMap<Uuid, Vec<DishResponse>> = HashMap::new();
		let mut uncategorized = Vec::new();
		let known: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
		for dish in dishes {
			match dish.category_id.filter(|id| known.contains(id)) {
				Some(id) => by_category.entry(id).or_default().push(dish.into()),
				None => uncategorized.push(dish.into()),
			}
		}

		Self {
			id: menu.id,
			place_id: menu.place_id,
			categories: categories
				.into_iter()
				.map(|category| DishCategoryResponse {
					dishes: by_category.remove(&category.id).unwrap_or_default(),
					id: category.id,
					name: category.name,
					name_zh: category.name_zh,
				})
				.collect(),
			uncategorized,
			created_at: menu.created_at,
			updated_at: menu.updated_at,
		}
	}
}
