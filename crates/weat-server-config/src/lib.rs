// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the weat server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`WEAT_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use weat_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub search: SearchConfig,
	pub cors: CorsConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`WEAT_SERVER_*`)
/// 2. Config file (`/etc/weat/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let search = layer.search.unwrap_or_default().finalize()?;
	let cors = layer.cors.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.target,
		similarity_threshold = search.similarity_threshold,
		cors_origins = ?cors.allow_origins,
		auth_configured = auth.is_configured(),
		dev_mode = auth.dev_mode,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		search,
		cors,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig) -> Result<(), ConfigError> {
	if auth.dev_mode && auth.environment == "production" {
		return Err(ConfigError::Validation(
			"WEAT_SERVER_AUTH_DEV_MODE=1 is set while WEAT_SERVER_ENV=production. \
			 Admin routes would be open to anyone. Remove WEAT_SERVER_AUTH_DEV_MODE or set \
			 WEAT_SERVER_ENV to a non-production value."
				.to_string(),
		));
	}

	if !auth.dev_mode && auth.environment == "production" && !auth.is_configured() {
		return Err(ConfigError::Validation(
			"Cognito client id and user pool (or issuer and JWKS URL) must be configured \
			 when WEAT_SERVER_ENV=production"
				.to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dev_mode_production_validation() {
		let auth = AuthConfig {
			dev_mode: true,
			environment: "production".to_string(),
			..Default::default()
		};
		assert!(validate_config(&auth).is_err());
	}

	#[test]
	fn test_dev_mode_development_allowed() {
		let auth = AuthConfig {
			dev_mode: true,
			environment: "development".to_string(),
			..Default::default()
		};
		assert!(validate_config(&auth).is_ok());
	}

	#[test]
	fn test_production_requires_cognito() {
		let auth = AuthConfig {
			environment: "production".to_string(),
			..Default::default()
		};
		assert!(validate_config(&auth).is_err());

		let auth = AuthConfigLayer {
			environment: Some("production".to_string()),
			cognito_region: Some("us-east-1".to_string()),
			cognito_user_pool_id: Some("us-east-1_pool".to_string()),
			cognito_client_id: Some("client".to_string()),
			..Default::default()
		}
		.finalize();
		assert!(validate_config(&auth).is_ok());
	}

	#[test]
	fn test_finalize_defaults() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config.socket_addr(), "0.0.0.0:8000");
		assert_eq!(config.search.similarity_threshold, 0.3);
		assert!(config.cors.allows_any_origin());
	}

	#[test]
	fn test_finalize_rejects_bad_threshold() {
		let layer = ServerConfigLayer {
			search: Some(SearchConfigLayer {
				similarity_threshold: Some(1.5),
			}),
			..Default::default()
		};
		assert!(matches!(
			finalize(layer),
			Err(ConfigError::InvalidValue { .. })
		));
	}
}
