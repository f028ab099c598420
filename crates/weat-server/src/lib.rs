// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! weat places directory server.
//!
//! Public endpoints browse and search places, tags and tag types; admin
//! endpoints under `/admin` mutate them and require a Cognito token carrying
//! the admin group.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod error;
pub mod routes;
pub mod services;
pub mod typed_router;
pub mod validation;

pub use api::{cors_layer, create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use weat_server_config::ServerConfig;
