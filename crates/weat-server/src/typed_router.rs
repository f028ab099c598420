// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Routers whose type records the access policy of their routes.
//!
//! Routes added to an [`AdminRouter`] are wrapped in
//! [`require_admin_layer`](crate::auth_middleware::require_admin_layer) when
//! built; a [`PublicRouter`] adds nothing.

use axum::{middleware::from_fn_with_state, routing::MethodRouter, Router};

use crate::{api::AppState, auth_middleware::require_admin_layer};

pub struct AdminRouter(Router<AppState>);

impl AdminRouter {
	pub fn new() -> Self {
		Self(Router::new())
	}

	pub fn route(self, path: &str, method_router: MethodRouter<AppState>) -> Self {
		Self(self.0.route(path, method_router))
	}

	pub fn nest(self, path: &str, router: AdminRouter) -> Self {
		Self(self.0.nest(path, router.0))
	}

	pub fn build(self, state: AppState) -> Router<AppState> {
		self.0.layer(from_fn_with_state(state, require_admin_layer))
	}
}

impl Default for AdminRouter {
	fn default() -> Self {
		Self::new()
	}
}

pub struct PublicRouter(Router<AppState>);

impl PublicRouter {
	pub fn new() -> Self {
		Self(Router::new())
	}

	pub fn route(self, path: &str, method_router: MethodRouter<AppState>) -> Self {
		Self(self.0.route(path, method_router))
	}

	pub fn nest(self, path: &str, router: PublicRouter) -> Self {
		Self(self.0.nest(path, router.0))
	}

	pub fn build(self) -> Router<AppState> {
		self.0
	}
}

impl Default for PublicRouter {
	fn default() -> Self {
		Self::new()
	}
}
