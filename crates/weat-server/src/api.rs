// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{
	http::HeaderValue,
	routing::{get, post, put},
	Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use weat_server_auth::{JwksClient, TokenVerifier};
use weat_server_config::{AuthConfig, CorsConfig, ServerConfig};
use weat_server_db::PgPool;

use crate::api_docs::ApiDoc;
use crate::routes::{health, menus, places, tag_types, tags};
use crate::typed_router::{AdminRouter, PublicRouter};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub pool: PgPool,
	pub auth_config: AuthConfig,
	/// `None` when the identity provider is not configured; admin routes then
	/// reject every token.
	pub verifier: Option<TokenVerifier>,
	pub similarity_threshold: f64,
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("auth_config", &self.auth_config)
			.field("verifier", &self.verifier)
			.field("similarity_threshold", &self.similarity_threshold)
			.finish_non_exhaustive()
	}
}

pub fn create_app_state(pool: PgPool, config: &ServerConfig) -> AppState {
	AppState {
		pool,
		auth_config: config.auth.clone(),
		verifier: create_verifier(&config.auth),
		similarity_threshold: config.search.similarity_threshold,
	}
}

fn create_verifier(auth: &AuthConfig) -> Option<TokenVerifier> {
	match (&auth.client_id, &auth.issuer, &auth.jwks_url) {
		(Some(client_id), Some(issuer), Some(jwks_url)) => {
			let keys = match JwksClient::new(
				jwks_url.clone(),
				Duration::from_secs(auth.jwks_cache_ttl_secs),
			) {
				Ok(keys) => keys,
				Err(e) => {
					tracing::error!(error = %e, "failed to build JWKS client, admin routes will reject all requests");
					return None;
				}
			};
			tracing::info!(issuer = %issuer, jwks_url = %jwks_url, "token verification enabled");
			Some(TokenVerifier::new(Arc::new(keys), client_id, issuer))
		}
		_ => {
			if !auth.dev_mode {
				tracing::warn!("identity provider not configured, admin routes will reject all requests");
			}
			None
		}
	}
}

/// Build the CORS layer: any origin for `*`, otherwise the configured list.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
	if config.allows_any_origin() {
		return layer.allow_origin(Any);
	}

	let origins: Vec<HeaderValue> = config
		.allow_origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
				None
			}
		})
		.collect();
	layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(state: AppState) -> Router {
	let public = PublicRouter::new()
		.route("/health", get(health::health_check))
		.route("/places/", get(places::list_places))
		.route("/places/{id}", get(places::get_place))
		.route("/places/{id}/menus", get(menus::list_menus))
		.route("/tags/{place_type}", get(tags::list_tags))
		.route("/tag-types/{place_type}", get(tag_types::list_tag_types));

	let admin = AdminRouter::new()
		.route("/places/", post(places::create_place))
		.route(
			"/places/{id}",
			put(places::update_place).delete(places::delete_place),
		)
		.route("/tags/", post(tags::create_tag))
		.route("/tags/{id}", put(tags::update_tag).delete(tags::delete_tag))
		.route("/tag-types/", post(tag_types::create_tag_type))
		.route(
			"/tag-types/{id}",
			put(tag_types::update_tag_type).delete(tag_types::delete_tag_type),
		);

	public
		.build()
		.nest("/admin", admin.build(state.clone()))
		.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
		.with_state(state)
}
