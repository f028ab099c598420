// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test support for database-backed tests.
//!
//! Tests need a PostgreSQL server with the `postgis` and `pg_trgm` extensions
//! available. Point `WEAT_TEST_DATABASE_URL` at it; when the variable is unset
//! [`test_db`] returns `None` and the calling test should return early.

use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::entity::Entity;
use crate::place::Place;
use crate::pool::{create_pool, run_migrations};
use crate::tag::Tag;
use crate::tag_type::TagType;
use crate::types::{Location, PlaceType};
use crate::uow::UnitOfWork;

pub const TEST_DATABASE_URL_ENV: &str = "WEAT_TEST_DATABASE_URL";

static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// A migrated, empty database. Holds a lock so tests in one binary do not
/// truncate each other's rows.
pub struct TestDb {
	pub pool: PgPool,
	_guard: MutexGuard<'static, ()>,
}

impl TestDb {
	pub fn uow(&self) -> UnitOfWork {
		UnitOfWork::new(self.pool.clone())
	}
}

pub async fn test_db() -> Option<TestDb> {
	let url = match std::env::var(TEST_DATABASE_URL_ENV) {
		Ok(url) if !url.is_empty() => url,
		_ => {
			eprintln!("{TEST_DATABASE_URL_ENV} not set, skipping database test");
			return None;
		}
	};

	let guard = DB_LOCK.lock().await;
	let pool = create_pool(&url, 5)
		.await
		.expect("connect to test database");
	run_migrations(&pool).await.expect("run migrations");
	sqlx::query("TRUNCATE dishes, dish_categories, menus, place_tag, places, tags, tag_types CASCADE")
		.execute(&pool)
		.await
		.expect("truncate tables");

	Some(TestDb {
		pool,
		_guard: guard,
	})
}

/// Insert and commit an entity, returning its reloaded state.
pub async fn insert<E: Entity>(pool: &PgPool, entity: E) -> E {
	let mut uow = UnitOfWork::new(pool.clone());
	uow.add(&entity).await.expect("stage entity");
	uow.commit().await.expect("commit entity");
	uow.refresh::<E>(entity.id()).await.expect("reload entity")
}

pub async fn insert_tag_type(pool: &PgPool, name: &str) -> TagType {
	insert(pool, TagType::new(name, PlaceType::Food)).await
}

pub async fn insert_tag(pool: &PgPool, name: &str, tag_type_id: Uuid) -> Tag {
	insert(pool, Tag::new(name, tag_type_id)).await
}

pub async fn insert_place(pool: &PgPool, name: &str, latitude: f64, longitude: f64) -> Place {
	let mut place = Place::new(name, PlaceType::Food);
	place.location = Some(Location {
		latitude,
		longitude,
	});
	insert(pool, place).await
}
