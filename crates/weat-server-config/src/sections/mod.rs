// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for weat-server.

pub mod auth;
pub mod cors;
pub mod database;
pub mod http;
pub mod logging;
pub mod search;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use cors::{parse_origin_list, CorsConfig, CorsConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use search::{SearchConfig, SearchConfigLayer, DEFAULT_SIMILARITY_THRESHOLD};
