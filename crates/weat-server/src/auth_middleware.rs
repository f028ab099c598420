// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin authorization middleware for Axum.
//!
//! Admin routes require a bearer token issued by the configured user pool for
//! the configured app client, whose `cognito:groups` claim lists the admin
//! group.
//!
//! | Outcome | Response |
//! |---------|----------|
//! | No token, bad signature, wrong audience or issuer, expired, unknown key | 401 `Invalid token header` |
//! | Valid token without the admin group | 403 `Not an admin user` |
//! | Valid admin token | request continues with [`CognitoClaims`] in its extensions |
//!
//! # Dev Mode
//!
//! With `WEAT_SERVER_AUTH_DEV_MODE=1` the check is skipped entirely. Config
//! loading refuses dev mode when `WEAT_SERVER_ENV=production`.

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::{IntoResponse, Response},
};
use tracing::instrument;
use weat_common_config::SecretString;
use weat_server_auth::{extract_bearer_token, require_group, AuthError, CognitoClaims};

use crate::{api::AppState, error::ServerError};

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token header";
pub const NOT_ADMIN_MESSAGE: &str = "Not an admin user";

#[instrument(
	name = "require_admin_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn require_admin_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let span = tracing::Span::current();

	if state.auth_config.dev_mode {
		span.record("auth_method", "dev_mode");
		tracing::warn!("DEV MODE: admin check bypassed, do not use in production");
		return next.run(request).await;
	}

	let token = extract_bearer_token(request.headers());
	match authorize(&state, token).await {
		Ok(claims) => {
			span.record("auth_method", "bearer");
			span.record("user_id", tracing::field::display(&claims.sub));
			request.extensions_mut().insert(claims);
			next.run(request).await
		}
		Err(err) => {
			span.record("auth_method", "none");
			tracing::debug!(error = %err, "admin authorization failed");
			rejection(&err).into_response()
		}
	}
}

async fn authorize(
	state: &AppState,
	token: Option<SecretString>,
) -> Result<CognitoClaims, AuthError> {
	let token = token.ok_or(AuthError::MissingToken)?;
	let verifier = state.verifier.as_ref().ok_or(AuthError::NotConfigured)?;
	let claims = verifier.verify(token.expose()).await?;
	require_group(&claims, &state.auth_config.admin_group)?;
	Ok(claims)
}

fn rejection(err: &AuthError) -> ServerError {
	if err.is_unauthenticated() {
		ServerError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
	} else {
		ServerError::Forbidden(NOT_ADMIN_MESSAGE.to_string())
	}
}
