// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Place listing, search and mutation.

use std::collections::HashSet;

use tracing::instrument;
use uuid::Uuid;
use weat_server_api::{CreatePlaceRequest, UpdatePlaceRequest};
use weat_server_db::{
	paginate, with_similarity_threshold, DbError, Entity, LocationBounds, Page, Place, Select, Tag,
	UnitOfWork, GOOGLE_MAPS_PLACE_ID_KEY,
};

use super::{apply_sort, load, Result, ServiceError, SortOptions};
use crate::validation::{
	validate_bounds, validate_location, validate_name, validate_opening_hours,
	validate_phone_number, ValidationError,
};

/// What to list. `None` fields mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ListPlacesOptions {
	pub bounds: LocationBounds,
	pub sort: Option<SortOptions>,
	pub filter: Option<String>,
	pub page: Option<Page>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceListing {
	/// One page and the size of the whole result.
	Page { items: Vec<Place>, total: i64 },
	All(Vec<Place>),
}

impl PlaceListing {
	pub fn items(&self) -> &[Place] {
		match self {
			PlaceListing::Page { items, .. } | PlaceListing::All(items) => items,
		}
	}

	/// Items and total; an unpaginated listing's total is its length.
	pub fn into_parts(self) -> (Vec<Place>, i64) {
		match self {
			PlaceListing::Page { items, total } => (items, total),
			PlaceListing::All(items) => {
				let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
				(items, total)
			}
		}
	}
}

/// Build the listing query. Fails on invalid bounds or sort column without
/// touching the database.
pub fn build_list_query(options: &ListPlacesOptions) -> Result<Select> {
	validate_bounds(&options.bounds)?;

	let mut select = Place::within_bounds(Place::select(), &options.bounds);
	let query = options
		.filter
		.as_deref()
		.map(str::trim)
		.filter(|q| !q.is_empty());

	if let Some(q) = query {
		select = Place::fuzzy_match(select, q);
		if options.sort.is_none() {
			select = Place::order_by_similarity(select, q);
		}
	}

	apply_sort::<Place>(select, options.sort.as_ref())
}

#[instrument(skip(uow, options), fields(q = ?options.filter, page = ?options.page))]
pub async fn list_places(
	uow: &mut UnitOfWork,
	options: &ListPlacesOptions,
	similarity_threshold: f64,
) -> Result<PlaceListing> {
	let select = build_list_query(options)?;
	with_similarity_threshold(uow, similarity_threshold).await?;

	let listing = match options.page {
		Some(page) => {
			let total = uow.get_count(&select).await?;
			let items = uow.get_all::<Place>(&paginate(select, page)).await?;
			PlaceListing::Page { items, total }
		}
		None => PlaceListing::All(uow.get_all::<Place>(&select).await?),
	};

	tracing::debug!(returned = listing.items().len(), "places listed");
	Ok(listing)
}

pub async fn get_place(uow: &mut UnitOfWork, id: Uuid) -> Result<Place> {
	load::<Place>(uow, id).await
}

#[instrument(skip(uow, request), fields(name = %request.name))]
pub async fn create_place(uow: &mut UnitOfWork, request: CreatePlaceRequest) -> Result<Place> {
	validate_name(&request.name)?;
	if let Some(location) = &request.location {
		validate_location(location)?;
	}
	if let Some(phone_number) = &request.phone_number {
		validate_phone_number(phone_number)?;
	}
	validate_opening_hours(&request.opening_hours)?;

	let mut place = Place::new(request.name, request.place_type);
	place.name_zh = request.name_zh;
	place.address = request.address;
	place.location = request.location;
	place.google_maps_url = request.google_maps_url;
	place.google_maps_place_id = request.google_maps_place_id;
	place.phone_number = request.phone_number;
	place.website_url = request.website_url;
	place.opening_hours = request.opening_hours;
	place.properties = request.properties;
	place.tags = resolve_tags(uow, &request.tag_ids).await?;

	save(uow, &place).await?;
	tracing::info!(place_id = %place.id, "place created");
	Ok(uow.refresh::<Place>(place.id).await?)
}

/// Apply the fields present in `request`; absent fields keep their value.
#[instrument(skip(uow, request))]
pub async fn update_place(
	uow: &mut UnitOfWork,
	id: Uuid,
	request: UpdatePlaceRequest,
) -> Result<Place> {
	if let Some(name) = &request.name {
		validate_name(name)?;
	}
	if let Some(Some(location)) = &request.location {
		validate_location(location)?;
	}
	if let Some(Some(phone_number)) = &request.phone_number {
		validate_phone_number(phone_number)?;
	}
	if let Some(opening_hours) = &request.opening_hours {
		validate_opening_hours(opening_hours)?;
	}

	let mut place = load::<Place>(uow, id).await?;

	if let Some(name) = request.name {
		place.name = name;
	}
	if let Some(place_type) = request.place_type {
		place.place_type = place_type;
	}
	if let Some(name_zh) = request.name_zh {
		place.name_zh = name_zh;
	}
	if let Some(address) = request.address {
		place.address = address;
	}
	if let Some(location) = request.location {
		place.location = location;
	}
	if let Some(url) = request.google_maps_url {
		place.google_maps_url = url;
	}
	if let Some(place_id) = request.google_maps_place_id {
		place.google_maps_place_id = place_id;
	}
	if let Some(phone_number) = request.phone_number {
		place.phone_number = phone_number;
	}
	if let Some(url) = request.website_url {
		place.website_url = url;
	}
	if let Some(opening_hours) = request.opening_hours {
		place.opening_hours = opening_hours;
	}
	if let Some(properties) = request.properties {
		place.properties = properties;
	}
	if let Some(tag_ids) = &request.tag_ids {
		place.tags = resolve_tags(uow, tag_ids).await?;
	}

	save(uow, &place).await?;
	tracing::info!(place_id = %place.id, "place updated");
	Ok(uow.refresh::<Place>(place.id).await?)
}

#[instrument(skip(uow))]
pub async fn delete_place(uow: &mut UnitOfWork, id: Uuid) -> Result<()> {
	let place = load::<Place>(uow, id).await?;
	uow.delete(&place).await?;
	uow.commit().await?;
	tracing::info!(place_id = %id, "place deleted");
	Ok(())
}

/// Load the tags named by `ids`. Every distinct id must exist.
async fn resolve_tags(uow: &mut UnitOfWork, ids: &[Uuid]) -> Result<Vec<Tag>> {
	let mut seen = HashSet::new();
	let wanted: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
	if wanted.is_empty() {
		return Ok(Vec::new());
	}

	let tags = uow
		.get_all::<Tag>(&Tag::with_ids(Tag::select(), wanted.clone()))
		.await?;
	let missing = missing_ids(&wanted, &tags);
	if !missing.is_empty() {
		tracing::debug!(missing = missing.len(), "unknown tag ids");
		return Err(ValidationError::InvalidTagIds(missing).into());
	}
	Ok(tags)
}

fn missing_ids(wanted: &[Uuid], found: &[Tag]) -> Vec<Uuid> {
	let found: HashSet<Uuid> = found.iter().map(|t| t.id).collect();
	wanted
		.iter()
		.copied()
		.filter(|id| !found.contains(id))
		.collect()
}

async fn save(uow: &mut UnitOfWork, place: &Place) -> Result<()> {
	uow.add(place).await?;
	uow.commit()
		.await
		.map_err(|err| commit_error(err, place.google_maps_place_id.as_deref()))
}

fn commit_error(err: DbError, google_maps_place_id: Option<&str>) -> ServiceError {
	match google_maps_place_id {
		Some(value) if err.is_unique_violation_on(GOOGLE_MAPS_PLACE_ID_KEY) => {
			ServiceError::DuplicatePlaceId(value.to_string())
		}
		_ => err.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use weat_server_db::{IntegrityKind, PlaceType, SortOrder};

	fn options() -> ListPlacesOptions {
		ListPlacesOptions::default()
	}

	#[test]
	fn test_default_listing_orders_by_id() {
		let sql = build_list_query(&options()).unwrap().to_sql();
		assert!(sql.contains("p.location_geom && ST_MakeEnvelope($1, $2, $3, $4, 4326)"));
		assert!(sql.ends_with("GROUP BY p.id ORDER BY p.id ASC"));
		assert!(!sql.contains('%'));
	}

	#[test]
	fn test_search_without_sort_ranks_by_similarity() {
		let sql = build_list_query(&ListPlacesOptions {
			filter: Some(" ramen ".to_string()),
			..options()
		})
		.unwrap()
		.to_sql();
		assert!(sql.contains("(p.name % $5 OR p.name_zh % $6 OR p.address % $7)"));
		assert!(sql.contains("ORDER BY 1.0 * CAST(COALESCE(p.name <-> $8, 1) AS float8)"));
		assert!(sql.ends_with(", 1) AS float8) ASC, p.id ASC"));
	}

	#[test]
	fn test_explicit_sort_replaces_similarity_ranking() {
		let sql = build_list_query(&ListPlacesOptions {
			filter: Some("ramen".to_string()),
			sort: Some(SortOptions::new("name", SortOrder::Desc)),
			..options()
		})
		.unwrap()
		.to_sql();
		assert!(sql.contains("p.name % $5"));
		assert!(!sql.contains("<->"));
		assert!(sql.ends_with("ORDER BY lower(p.name) DESC, p.id ASC"));
	}

	#[test]
	fn test_blank_filter_is_ignored() {
		let sql = build_list_query(&ListPlacesOptions {
			filter: Some("   ".to_string()),
			..options()
		})
		.unwrap()
		.to_sql();
		assert!(!sql.contains('%'));
	}

	#[test]
	fn test_invalid_inputs_fail_before_query() {
		let err = build_list_query(&ListPlacesOptions {
			sort: Some(SortOptions::new("secret", SortOrder::Asc)),
			..options()
		})
		.unwrap_err();
		assert!(matches!(
			err,
			ServiceError::Validation(ValidationError::InvalidSortColumn(c)) if c == "secret"
		));

		let err = build_list_query(&ListPlacesOptions {
			bounds: LocationBounds {
				sw_lat: 10.0,
				ne_lat: 0.0,
				..LocationBounds::WORLD
			},
			..options()
		})
		.unwrap_err();
		assert!(matches!(
			err,
			ServiceError::Validation(ValidationError::InvalidBounds { .. })
		));
	}

	#[test]
	fn test_missing_ids_preserves_request_order() {
		let tag_type = Uuid::new_v4();
		let found = Tag::new("Ramen", tag_type);
		let a = Uuid::new_v4();
		let b = Uuid::new_v4();
		assert_eq!(missing_ids(&[a, found.id, b], &[found.clone()]), vec![a, b]);
		assert!(missing_ids(&[found.id], &[found]).is_empty());
	}

	#[test]
	fn test_commit_error_maps_duplicate_google_id() {
		let unique = || DbError::Integrity {
			kind: IntegrityKind::Unique,
			constraint: Some(GOOGLE_MAPS_PLACE_ID_KEY.to_string()),
			message: "duplicate key".to_string(),
		};
		assert!(matches!(
			commit_error(unique(), Some("ChIJ1")),
			ServiceError::DuplicatePlaceId(v) if v == "ChIJ1"
		));
		assert!(matches!(
			commit_error(unique(), None),
			ServiceError::DatabaseValidation(_)
		));

		let other = DbError::Integrity {
			kind: IntegrityKind::Unique,
			constraint: Some("places_pkey".to_string()),
			message: "duplicate key".to_string(),
		};
		assert!(matches!(
			commit_error(other, Some("ChIJ1")),
			ServiceError::DatabaseValidation(_)
		));
	}

	#[test]
	fn test_listing_parts() {
		let place = Place::new("Noodles", PlaceType::Food);
		let (items, total) = PlaceListing::All(vec![place.clone()]).into_parts();
		assert_eq!(items, vec![place.clone()]);
		assert_eq!(total, 1);

		let (items, total) = PlaceListing::Page {
			items: vec![place],
			total: 42,
		}
		.into_parts();
		assert_eq!(items.len(), 1);
		assert_eq!(total, 42);
	}
}
