// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP request and response types for the weat server.
//!
//! Enable the `openapi` feature (on by default) to derive utoipa schemas.

pub mod common;
pub mod menus;
pub mod places;
pub mod tag_types;
pub mod tags;

pub use common::{double_option, HealthResponse, PaginatedResponse, SortParams};
pub use menus::{DishCategoryResponse, DishResponse, MenuResponse};
pub use places::{CreatePlaceRequest, ListPlacesParams, PlaceResponse, UpdatePlaceRequest};
pub use tag_types::{CreateTagTypeRequest, TagTypeResponse, UpdateTagTypeRequest};
pub use tags::{CreateTagRequest, TagResponse, UpdateTagRequest};
