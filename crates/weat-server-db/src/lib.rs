// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # weat-server-db
//!
//! Persistence layer for the weat server using PostgreSQL (PostGIS, pg_trgm)
//! via sqlx. Entities: places, tags, tag types, and the menus, dish
//! categories and dishes belonging to a place.
//!
//! ## Unit of Work
//!
//! Every request owns one [`UnitOfWork`], which wraps one transaction:
//!
//! ```rust,ignore
//! let mut uow = UnitOfWork::new(pool.clone());
//! let place = uow.get::<Place>(id).await?.ok_or(...)?;
//! uow.add(&updated).await?;
//! uow.commit().await?;
//! let fresh = uow.refresh::<Place>(id).await?;
//! ```
//!
//! Unique and foreign-key constraints are `DEFERRABLE INITIALLY DEFERRED`, so
//! violations surface from `commit()` as [`DbError::Integrity`].
//!
//! ## Query Composition
//!
//! Entities expose a base [`Select`]; filters are added by entity-specific
//! builders (e.g. [`Place::within_bounds`]) and the generic helpers
//! [`sort`], [`paginate`] and [`with_similarity_threshold`] finish the plan.
//!
//! ## Error Handling
//!
//! | Variant | When |
//! |---------|------|
//! | `NotFound` | `refresh` of an id that does not exist |
//! | `Integrity` | Class 23 SQLSTATE, classified by kind with the constraint name |
//! | `InvalidSortColumn` | `sort_by` not in the entity's allow-list |
//! | `Sqlx` | Everything else from the driver |
//! | `Internal` | Stored data that cannot be mapped back |

pub mod dish;
pub mod entity;
pub mod error;
pub mod menu;
pub mod place;
pub mod pool;
pub mod query;
pub mod tag;
pub mod tag_type;
pub mod types;
pub mod uow;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dish::{Dish, Price, PriceError, DISH_SORT_COLUMNS};
pub use entity::Entity;
pub use error::{DbError, IntegrityKind, Result};
pub use menu::{DishCategory, Menu, DISH_CATEGORY_SORT_COLUMNS, MENU_SORT_COLUMNS};
pub use place::{Place, GOOGLE_MAPS_PLACE_ID_KEY, PLACE_SORT_COLUMNS};
pub use pool::{create_pool, ping, run_migrations};
pub use query::{
	paginate, sort, with_similarity_threshold, Expr, Page, Select, SortColumn, SortColumns,
	SortOrder, Value,
};
pub use tag::{Tag, TAG_SORT_COLUMNS};
pub use tag_type::{TagType, TAG_TYPE_SORT_COLUMNS};
pub use types::{Location, LocationBounds, OpeningHours, PlaceType};
pub use uow::UnitOfWork;

pub use sqlx::PgPool;
