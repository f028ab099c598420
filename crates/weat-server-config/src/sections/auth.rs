// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.
//!
//! Admin endpoints accept RS256 access tokens issued by a Cognito user pool.
//! The JWKS URL and issuer are derived from region and pool id unless given
//! explicitly.

use serde::Deserialize;

const DEFAULT_ADMIN_GROUP: &str = "admin";
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub dev_mode: bool,
	pub environment: String,
	/// Expected `aud` claim.
	pub client_id: Option<String>,
	/// Expected `iss` claim.
	pub issuer: Option<String>,
	pub jwks_url: Option<String>,
	/// Group listed in `cognito:groups` that grants admin access.
	pub admin_group: String,
	pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
	/// True when token verification has everything it needs.
	pub fn is_configured(&self) -> bool {
		self.client_id.is_some() && self.issuer.is_some() && self.jwks_url.is_some()
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub dev_mode: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub cognito_region: Option<String>,
	#[serde(default)]
	pub cognito_user_pool_id: Option<String>,
	#[serde(default)]
	pub cognito_client_id: Option<String>,
	#[serde(default)]
	pub cognito_issuer: Option<String>,
	#[serde(default)]
	pub cognito_jwks_url: Option<String>,
	#[serde(default)]
	pub admin_group: Option<String>,
	#[serde(default)]
	pub jwks_cache_ttl_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.dev_mode.is_some() {
			self.dev_mode = other.dev_mode;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.cognito_region.is_some() {
			self.cognito_region = other.cognito_region;
		}
		if other.cognito_user_pool_id.is_some() {
			self.cognito_user_pool_id = other.cognito_user_pool_id;
		}
		if other.cognito_client_id.is_some() {
			self.cognito_client_id = other.cognito_client_id;
		}
		if other.cognito_issuer.is_some() {
			self.cognito_issuer = other.cognito_issuer;
		}
		if other.cognito_jwks_url.is_some() {
			self.cognito_jwks_url = other.cognito_jwks_url;
		}
		if other.admin_group.is_some() {
			self.admin_group = other.admin_group;
		}
		if other.jwks_cache_ttl_secs.is_some() {
			self.jwks_cache_ttl_secs = other.jwks_cache_ttl_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let pool_issuer = match (&self.cognito_region, &self.cognito_user_pool_id) {
			(Some(region), Some(pool_id)) => {
				Some(format!("https://cognito-idp.{region}.amazonaws.com/{pool_id}"))
			}
			_ => None,
		};

		let issuer = self.cognito_issuer.or_else(|| pool_issuer.clone());
		let jwks_url = self.cognito_jwks_url.or_else(|| {
			issuer
				.as_ref()
				.map(|issuer| format!("{issuer}/.well-known/jwks.json"))
		});

		AuthConfig {
			dev_mode: self.dev_mode.unwrap_or(false),
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
			client_id: self.cognito_client_id,
			issuer,
			jwks_url,
			admin_group: self
				.admin_group
				.unwrap_or_else(|| DEFAULT_ADMIN_GROUP.to_string()),
			jwks_cache_ttl_secs: self
				.jwks_cache_ttl_secs
				.unwrap_or(DEFAULT_JWKS_CACHE_TTL_SECS),
		}
	}
}
