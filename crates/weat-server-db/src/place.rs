// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Place entity and the place-specific query fragments.
//!
//! Places are stored with a `geometry(Point, 4326)` column and exposed as a
//! latitude/longitude pair. Tags are aggregated into a JSON array per place so
//! a single row carries the whole record; places without tags get `[]`.

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
use crate::tag::Tag;
use crate::types::{Location, LocationBounds, OpeningHours, PlaceType};

/// Weights applied to the trigram distance of each searchable column.
pub const NAME_WEIGHT: f64 = 1.0;
pub const NAME_ZH_WEIGHT: f64 = 1.5;
pub const ADDRESS_WEIGHT: f64 = 2.0;

pub static PLACE_SORT_COLUMNS: SortColumns = SortColumns::new(
	"p.id",
	&[
		("id", SortColumn::plain("p.id")),
		("name", SortColumn::text("p.name")),
		("name_zh", SortColumn::text("p.name_zh")),
		("type", SortColumn::text("p.type")),
		("address", SortColumn::text("p.address")),
		("google_maps_place_id", SortColumn::text("p.google_maps_place_id")),
		("created_at", SortColumn::plain("p.created_at")),
		("updated_at", SortColumn::plain("p.updated_at")),
	],
);

/// Name of the unique constraint on `google_maps_place_id`.
pub const GOOGLE_MAPS_PLACE_ID_KEY: &str = "places_google_maps_place_id_key";

const PLACE_SELECT: &str = "\
SELECT p.id, p.name, p.name_zh, p.type, p.address, \
ST_Y(p.location_geom) AS latitude, ST_X(p.location_geom) AS longitude, \
p.google_maps_url, p.google_maps_place_id, p.phone_number, p.website_url, \
p.opening_hours, p.properties, p.created_at, p.updated_at, \
COALESCE(json_agg(json_build_object(\
'id', t.id, 'name', t.name, 'tag_type_id', t.tag_type_id, 'tag_type_name', tt.name\
) ORDER BY t.name) FILTER (WHERE t.id IS NOT NULL), '[]'::json) AS tags \
FROM places p \
LEFT JOIN place_tag pt ON pt.place_id = p.id \
LEFT JOIN tags t ON t.id = pt.tag_id \
LEFT JOIN tag_types tt ON tt.id = t.tag_type_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
	pub id: Uuid,
	pub name: String,
	pub name_zh: Option<String>,
	#[serde(rename = "type")]
	pub place_type: PlaceType,
	pub address: Option<String>,
	pub location: Option<Location>,
	pub google_maps_url: Option<String>,
	pub google_maps_place_id: Option<String>,
	pub phone_number: Option<String>,
	pub website_url: Option<String>,
	pub opening_hours: Vec<OpeningHours>,
	pub properties: Map<String, JsonValue>,
	pub tags: Vec<Tag>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Place {
	pub fn new(name: impl Into<String>, place_type: PlaceType) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			name_zh: None,
			place_type,
			address: None,
			location: None,
			google_maps_url: None,
			google_maps_place_id: None,
			phone_number: None,
			website_url: None,
			opening_hours: Vec::new(),
			properties: Map::new(),
			tags: Vec::new(),
			created_at: now,
			updated_at: now,
		}
	}

	/// Keep places whose point intersects the envelope. Edges are inclusive.
	pub fn within_bounds(select: Select, bounds: &LocationBounds) -> Select {
		select.filter(
			Expr::sql("p.location_geom && ST_MakeEnvelope(")
				.bind(bounds.sw_lng)
				.push_sql(", ")
				.bind(bounds.sw_lat)
				.push_sql(", ")
				.bind(bounds.ne_lng)
				.push_sql(", ")
				.bind(bounds.ne_lat)
				.push_sql(", 4326)"),
		)
	}

	/// Keep places where any searchable column is trigram-similar to `q`
	/// under the transaction's similarity threshold.
	pub fn fuzzy_match(select: Select, q: &str) -> Select {
		select.filter(
			Expr::sql("(p.name % ")
				.bind(q)
				.push_sql(" OR p.name_zh % ")
				.bind(q)
				.push_sql(" OR p.address % ")
				.bind(q)
				.push_sql(")"),
		)
	}

	/// Order by weighted trigram distance to `q`, closest first. A NULL column
	/// counts as the maximum distance of 1.
	pub fn order_by_similarity(select: Select, q: &str) -> Select {
		select.order_by(
			Expr::sql(format!(
				"{NAME_WEIGHT:.1} * CAST(COALESCE(p.name <-> "
			))
			.bind(q)
			.push_sql(format!(
				", 1) AS float8) + {NAME_ZH_WEIGHT:.1} * CAST(COALESCE(p.name_zh <-> "
			))
			.bind(q)
			.push_sql(format!(
				", 1) AS float8) + {ADDRESS_WEIGHT:.1} * CAST(COALESCE(p.address <-> "
			))
			.bind(q)
			.push_sql(", 1) AS float8) ASC"),
		)
	}

	pub fn tag_ids(&self) -> Vec<Uuid> {
		self.tags.iter().map(|t| t.id).collect()
	}
}

#[async_trait]
impl Entity for Place {
	const NAME: &'static str = "Place";
	const TABLE: &'static str = "places";
	const ID_COLUMN: &'static str = "p.id";

	fn sort_columns() -> &'static SortColumns {
		&PLACE_SORT_COLUMNS
	}

	fn id(&self) -> Uuid {
		self.id
	}

	fn select() -> Select {
		Select::new(PLACE_SELECT).group_by("p.id")
	}

	fn from_row(row: &PgRow) -> Result<Self> {
		let place_type: String = row.try_get("type")?;
		let latitude: Option<f64> = row.try_get("latitude")?;
		let longitude: Option<f64> = row.try_get("longitude")?;
		let Json(opening_hours): Json<Vec<OpeningHours>> = row.try_get("opening_hours")?;
		let Json(properties): Json<Map<String, JsonValue>> = row.try_get("properties")?;
		let Json(tags): Json<Vec<Tag>> = row.try_get("tags")?;

		Ok(Self {
			id: row.try_get("id")?,
			name: row.try_get("name")?,
			name_zh: row.try_get("name_zh")?,
			place_type: place_type.parse().map_err(DbError::Internal)?,
			address: row.try_get("address")?,
			location: latitude
				.zip(longitude)
				.map(|(latitude, longitude)| Location {
					latitude,
					longitude,
				}),
			google_maps_url: row.try_get("google_maps_url")?,
			google_maps_place_id: row.try_get("google_maps_place_id")?,
			phone_number: row.try_get("phone_number")?,
			website_url: row.try_get("website_url")?,
			opening_hours,
			properties,
			tags,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	async fn persist(&self, conn: &mut PgConnection) -> std::result::Result<(), sqlx::Error> {
		sqlx::query(
			r#"
			INSERT INTO places (
				id, name, name_zh, type, address, location_geom,
				google_maps_url, google_maps_place_id, phone_number, website_url,
				opening_hours, properties
			)
			VALUES (
				$1, $2, $3, $4, $5, ST_SetSRID(ST_MakePoint($7::float8, $6::float8), 4326),
				$8, $9, $10, $11, $12, $13
			)
			ON CONFLICT (id) DO UPDATE SET
				name = EXCLUDED.name,
				name_zh = EXCLUDED.name_zh,
				type = EXCLUDED.type,
				address = EXCLUDED.address,
				location_geom = EXCLUDED.location_geom,
				google_maps_url = EXCLUDED.google_maps_url,
				google_maps_place_id = EXCLUDED.google_maps_place_id,
				phone_number = EXCLUDED.phone_number,
				website_url = EXCLUDED.website_url,
				opening_hours = EXCLUDED.opening_hours,
				properties = EXCLUDED.properties,
				updated_at = now()
			"#,
		)
		.bind(self.id)
		.bind(&self.name)
		.bind(&self.name_zh)
		.bind(self.place_type.as_str())
		.bind(&self.address)
		.bind(self.location.map(|l| l.latitude))
		.bind(self.location.map(|l| l.longitude))
		.bind(&self.google_maps_url)
		.bind(&self.google_maps_place_id)
		.bind(&self.phone_number)
		.bind(&self.website_url)
		.bind(Json(&self.opening_hours))
		.bind(Json(&self.properties))
		.execute(&mut *conn)
		.await?;

		sqlx::query("DELETE FROM place_tag WHERE place_id = $1")
			.bind(self.id)
			.execute(&mut *conn)
			.await?;

		let tag_ids = self.tag_ids();
		if !tag_ids.is_empty() {
			sqlx::query(
				"INSERT INTO place_tag (place_id, tag_id) \
				 SELECT $1::uuid, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
			)
			.bind(self.id)
			.bind(&tag_ids)
			.execute(&mut *conn)
			.await?;
		}

		Ok(())
	}
}
