// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};
use weat_common_config::load_secret_env;

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	parse_origin_list, AuthConfigLayer, CorsConfigLayer, DatabaseConfigLayer, HttpConfigLayer,
	LogFormat, LoggingConfigLayer, SearchConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/weat/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: WEAT_SERVER_<FIELD>. Database components use the `DB_` prefix
/// (`WEAT_SERVER_DB_HOST`, ...).
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			auth: Some(load_auth_from_env()?),
			search: Some(load_search_from_env()?),
			cors: Some(load_cors_from_env()),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn secret_env(name: &str) -> Result<Option<weat_common_config::SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("WEAT_SERVER_HOST"),
		port: env_parse("WEAT_SERVER_PORT", "u16")?,
		base_url: env_var("WEAT_SERVER_BASE_URL"),
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: secret_env("WEAT_SERVER_DATABASE_URL")?,
		username: env_var("WEAT_SERVER_DB_USERNAME"),
		password: secret_env("WEAT_SERVER_DB_PASSWORD")?,
		host: env_var("WEAT_SERVER_DB_HOST"),
		port: env_parse("WEAT_SERVER_DB_PORT", "u16")?,
		name: env_var("WEAT_SERVER_DB_NAME"),
		max_connections: env_parse("WEAT_SERVER_DATABASE_MAX_CONNECTIONS", "u32")?,
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		dev_mode: env_bool("WEAT_SERVER_AUTH_DEV_MODE"),
		environment: env_var("WEAT_SERVER_ENV"),
		cognito_region: env_var("WEAT_SERVER_COGNITO_REGION"),
		cognito_user_pool_id: env_var("WEAT_SERVER_COGNITO_USER_POOL_ID"),
		cognito_client_id: env_var("WEAT_SERVER_COGNITO_CLIENT_ID"),
		cognito_issuer: env_var("WEAT_SERVER_COGNITO_ISSUER"),
		cognito_jwks_url: env_var("WEAT_SERVER_COGNITO_JWKS_URL"),
		admin_group: env_var("WEAT_SERVER_ADMIN_GROUP"),
		jwks_cache_ttl_secs: env_parse("WEAT_SERVER_JWKS_CACHE_TTL_SECS", "u64")?,
	})
}

fn load_search_from_env() -> Result<SearchConfigLayer, ConfigError> {
	Ok(SearchConfigLayer {
		similarity_threshold: env_parse("WEAT_SERVER_PLACE_SEARCH_SIMILARITY_THRESHOLD", "f64")?,
	})
}

fn load_cors_from_env() -> CorsConfigLayer {
	CorsConfigLayer {
		allow_origins: env_var("WEAT_SERVER_CORS_ALLOW_ORIGINS").map(|s| parse_origin_list(&s)),
	}
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("WEAT_SERVER_LOG_FORMAT") {
		Some(raw) => Some(raw.parse::<LogFormat>().map_err(|message| {
			ConfigError::InvalidValue {
				key: "WEAT_SERVER_LOG_FORMAT".to_string(),
				message,
			}
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("WEAT_SERVER_LOG_LEVEL"),
		format,
	})
}
