// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use weat_server_db::testing::{insert_place, insert_tag, insert_tag_type, test_db};
use weat_server_db::{
	DbError, Entity, IntegrityKind, Place, PlaceType, Tag, TagType, UnitOfWork,
	GOOGLE_MAPS_PLACE_ID_KEY,
};

#[tokio::test]
async fn dropped_uow_rolls_back() {
	let Some(db) = test_db().await else { return };

	let place = Place::new("Uncommitted", PlaceType::Food);
	{
		let mut uow = db.uow();
		uow.add(&place).await.unwrap();
		assert!(uow.in_transaction());
	}

	let mut uow = db.uow();
	assert!(uow.get::<Place>(place.id).await.unwrap().is_none());
}

#[tokio::test]
async fn commit_persists_and_refresh_reads_server_state() {
	let Some(db) = test_db().await else { return };

	let mut place = Place::new("Committed", PlaceType::Food);
	place.name_zh = Some("已提交".to_string());
	let mut uow = db.uow();
	uow.add(&place).await.unwrap();
	uow.commit().await.unwrap();
	assert!(!uow.in_transaction());

	let stored = uow.refresh::<Place>(place.id).await.unwrap();
	assert_eq!(stored.name, "Committed");
	assert_eq!(stored.name_zh.as_deref(), Some("已提交"));
	assert!(stored.tags.is_empty());
	assert!(stored.location.is_none());
}

#[tokio::test]
async fn second_commit_is_noop() {
	let Some(db) = test_db().await else { return };

	let mut uow = db.uow();
	uow.add(&Place::new("Once", PlaceType::Food)).await.unwrap();
	uow.commit().await.unwrap();
	uow.commit().await.unwrap();
}

#[tokio::test]
async fn explicit_rollback_discards_staged_changes() {
	let Some(db) = test_db().await else { return };

	let tag_type = TagType::new("Cuisine", PlaceType::Food);
	let mut uow = db.uow();
	uow.add(&tag_type).await.unwrap();
	uow.rollback().await.unwrap();

	assert!(uow.get::<TagType>(tag_type.id).await.unwrap().is_none());
}

#[tokio::test]
async fn refresh_missing_is_not_found() {
	let Some(db) = test_db().await else { return };

	let mut uow = db.uow();
	let id = uuid::Uuid::new_v4();
	let err = uow.refresh::<Place>(id).await.unwrap_err();
	assert!(matches!(err, DbError::NotFound(msg) if msg == format!("Place(id={id})")));
}

#[tokio::test]
async fn duplicate_google_maps_id_fails_at_commit() {
	let Some(db) = test_db().await else { return };

	let mut first = Place::new("First", PlaceType::Food);
	first.google_maps_place_id = Some("ChIJdup".to_string());
	let mut second = Place::new("Second", PlaceType::Food);
	second.google_maps_place_id = Some("ChIJdup".to_string());

	let mut uow = db.uow();
	uow.add(&first).await.unwrap();
	uow.commit().await.unwrap();

	uow.add(&second).await.unwrap();
	let err = uow.commit().await.unwrap_err();
	assert!(err.is_unique_violation_on(GOOGLE_MAPS_PLACE_ID_KEY));

	assert!(uow.get::<Place>(second.id).await.unwrap().is_none());
}

#[tokio::test]
async fn tag_with_missing_tag_type_is_foreign_key_violation() {
	let Some(db) = test_db().await else { return };

	let mut uow = db.uow();
	uow.add(&Tag::new("Orphan", uuid::Uuid::new_v4()))
		.await
		.unwrap();
	let err = uow.commit().await.unwrap_err();
	assert!(matches!(
		err,
		DbError::Integrity {
			kind: IntegrityKind::ForeignKey,
			..
		}
	));
}

#[tokio::test]
async fn deleting_tag_type_with_tags_fails_at_commit() {
	let Some(db) = test_db().await else { return };

	let tag_type = insert_tag_type(&db.pool, "Cuisine").await;
	insert_tag(&db.pool, "Ramen", tag_type.id).await;

	let mut uow = db.uow();
	uow.delete(&tag_type).await.unwrap();
	let err = uow.commit().await.unwrap_err();
	assert!(err.is_integrity());
}

#[tokio::test]
async fn place_tags_are_replaced_on_update_and_cascade_on_delete() {
	let Some(db) = test_db().await else { return };

	let tag_type = insert_tag_type(&db.pool, "Cuisine").await;
	let ramen = insert_tag(&db.pool, "Ramen", tag_type.id).await;
	let sushi = insert_tag(&db.pool, "Sushi", tag_type.id).await;
	let mut place = insert_place(&db.pool, "Tagged", 1.0, 1.0).await;

	let mut uow = UnitOfWork::new(db.pool.clone());
	place.tags = vec![ramen.clone(), sushi.clone()];
	uow.add(&place).await.unwrap();
	uow.commit().await.unwrap();
	let stored = uow.refresh::<Place>(place.id).await.unwrap();
	assert_eq!(
		stored.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
		vec!["Ramen", "Sushi"]
	);
	assert_eq!(stored.tags[0].tag_type_name, "Cuisine");

	place.tags = vec![sushi.clone()];
	uow.add(&place).await.unwrap();
	uow.commit().await.unwrap();
	let stored = uow.refresh::<Place>(place.id).await.unwrap();
	assert_eq!(stored.tags, vec![sushi.clone()]);

	uow.delete(&sushi).await.unwrap();
	uow.commit().await.unwrap();
	let stored = uow.refresh::<Place>(place.id).await.unwrap();
	assert!(stored.tags.is_empty());
	assert!(stored.updated_at >= stored.created_at);
	assert_eq!(stored.id(), place.id);
}
