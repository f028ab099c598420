// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing::instrument;
use uuid::Uuid;
use weat_server_api::{CreateTagRequest, UpdateTagRequest};
use weat_server_db::{Entity, PlaceType, Select, Tag, UnitOfWork};

use super::{apply_sort, load, Result, SortOptions};
use crate::validation::validate_name;

pub fn build_list_query(place_type: PlaceType, sort: Option<&SortOptions>) -> Result<Select> {
	apply_sort::<Tag>(Tag::for_place_type(Tag::select(), place_type), sort)
}

#[instrument(skip(uow))]
pub async fn list_tags(
	uow: &mut UnitOfWork,
	place_type: PlaceType,
	sort: Option<&SortOptions>,
) -> Result<Vec<Tag>> {
	let select = build_list_query(place_type, sort)?;
	Ok(uow.get_all::<Tag>(&select).await?)
}

#[instrument(skip(uow, request), fields(name = %request.name))]
pub async fn create_tag(uow: &mut UnitOfWork, request: CreateTagRequest) -> Result<Tag> {
	validate_name(&request.name)?;

	let tag = Tag::new(request.name, request.tag_type_id);
	uow.add(&tag).await?;
	uow.commit().await?;
	tracing::info!(tag_id = %tag.id, "tag created");
	Ok(uow.refresh::<Tag>(tag.id).await?)
}

#[instrument(skip(uow, request))]
pub async fn update_tag(uow: &mut UnitOfWork, id: Uuid, request: UpdateTagRequest) -> Result<Tag> {
	validate_name(&request.name)?;

	let mut tag = load::<Tag>(uow, id).await?;
	tag.name = request.name;
	tag.tag_type_id = request.tag_type_id;

	uow.add(&tag).await?;
	uow.commit().await?;
	tracing::info!(tag_id = %id, "tag updated");
	Ok(uow.refresh::<Tag>(id).await?)
}

/// Deleting a tag also detaches it from every place.
#[instrument(skip(uow))]
pub async fn delete_tag(uow: &mut UnitOfWork, id: Uuid) -> Result<()> {
	let tag = load::<Tag>(uow, id).await?;
	uow.delete(&tag).await?;
	uow.commit().await?;
	tracing::info!(tag_id = %id, "tag deleted");
	Ok(())
}
