// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing::instrument;
use uuid::Uuid;
use weat_server_api::{CreateTagTypeRequest, UpdateTagTypeRequest};
use weat_server_db::{Entity, PlaceType, Select, TagType, UnitOfWork};

use super::{apply_sort, load, Result, SortOptions};
use crate::validation::validate_name;

pub fn build_list_query(place_type: PlaceType, sort: Option<&SortOptions>) -> Result<Select> {
	apply_sort::<TagType>(TagType::for_place_type(TagType::select(), place_type), sort)
}

#[instrument(skip(uow))]
pub async fn list_tag_types(
	uow: &mut UnitOfWork,
	place_type: PlaceType,
	sort: Option<&SortOptions>,
) -> Result<Vec<TagType>> {
	let select = build_list_query(place_type, sort)?;
	Ok(uow.get_all::<TagType>(&select).await?)
}

#[instrument(skip(uow, request), fields(name = %request.name))]
pub async fn create_tag_type(
	uow: &mut UnitOfWork,
	request: CreateTagTypeRequest,
) -> Result<TagType> {
	validate_name(&request.name)?;

	let tag_type = TagType::new(request.name, request.place_type);
	uow.add(&tag_type).await?;
	uow.commit().await?;
	tracing::info!(tag_type_id = %tag_type.id, "tag type created");
	Ok(uow.refresh::<TagType>(tag_type.id).await?)
}

#[instrument(skip(uow, request))]
pub async fn update_tag_type(
	uow: &mut UnitOfWork,
	id: Uuid,
	request: UpdateTagTypeRequest,
) -> Result<TagType> {
	validate_name(&request.name)?;

	let mut tag_type = load::<TagType>(uow, id).await?;
	tag_type.name = request.name;

	uow.add(&tag_type).await?;
	uow.commit().await?;
	tracing::info!(tag_type_id = %id, "tag type updated");
	Ok(uow.refresh::<TagType>(id).await?)
}

/// Fails with a database validation error while tags still use the type.
#[instrument(skip(uow))]
pub async fn delete_tag_type(uow: &mut UnitOfWork, id: Uuid) -> Result<()> {
	let tag_type = load::<TagType>(uow, id).await?;
	uow.delete(&tag_type).await?;
	uow.commit().await?;
	tracing::info!(tag_type_id = %id, "tag type deleted");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use weat_server_db::SortOrder;

	#[test]
	fn test_list_query() {
		let sql = build_list_query(PlaceType::Food, None).unwrap().to_sql();
		assert!(sql.contains("WHERE tt.place_type = $1"));
		assert!(sql.ends_with("ORDER BY tt.id ASC"));

		let sort = SortOptions::new("name", SortOrder::Asc);
		let sql = build_list_query(PlaceType::Food, Some(&sort))
			.unwrap()
			.to_sql();
		assert!(sql.ends_with("ORDER BY lower(tt.name) ASC, tt.id ASC"));
	}

	#[test]
	fn test_list_query_rejects_unknown_column() {
		assert!(build_list_query(
			PlaceType::Food,
			Some(&SortOptions::new("tags", SortOrder::Asc))
		)
		.is_err());
	}
}
