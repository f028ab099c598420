// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable helpers for loading secrets.
//!
//! Supports the `*_FILE` convention used by Docker and Kubernetes secrets.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::secret::Secret;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `VAR` or from the file named by `VAR_FILE`.
///
/// `VAR_FILE` wins when both are set. A single trailing newline is stripped
/// from file contents. Returns `Ok(None)` when neither is set.
pub fn load_secret_env(var: &str) -> Result<Option<Secret<String>>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(Secret::new(value))),
		_ => Ok(None),
	}
}

/// Like [`load_secret_env`] but fails when the secret is absent.
pub fn require_secret_env(var: &str) -> Result<Secret<String>, RequiredSecretError> {
	load_secret_env(var)?.ok_or_else(|| RequiredSecretError::Missing {
		var: var.to_string(),
		file_var: format!("{var}_FILE"),
	})
}

#[derive(Debug, Error)]
pub enum RequiredSecretError {
	#[error("required secret not found: set either {var} or {file_var}")]
	Missing { var: String, file_var: String },

	#[error(transparent)]
	Load(#[from] SecretEnvError),
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn returns_none_when_not_set() {
		let var = "WEAT_TEST_SECRET_UNSET_4821";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn reads_direct_value() {
		let var = "WEAT_TEST_SECRET_DIRECT_4821";
		env::remove_var(format!("{var}_FILE"));
		env::set_var(var, "direct-value");

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "direct-value");

		env::remove_var(var);
	}

	#[test]
	fn file_takes_precedence_and_strips_newline() {
		let var = "WEAT_TEST_SECRET_FILE_4821";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var(var, "direct-value");
		env::set_var(format!("{var}_FILE"), file.path());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_an_error() {
		let var = "WEAT_TEST_SECRET_EMPTY_PATH_4821";
		env::set_var(format!("{var}_FILE"), "");

		let result = load_secret_env(var);
		assert!(matches!(result, Err(SecretEnvError::EmptyPath { .. })));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn missing_file_is_an_error() {
		let var = "WEAT_TEST_SECRET_MISSING_FILE_4821";
		env::set_var(format!("{var}_FILE"), "/nonexistent/weat/secret");

		let result = load_secret_env(var);
		assert!(matches!(result, Err(SecretEnvError::Io { .. })));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn require_reports_both_variable_names() {
		let var = "WEAT_TEST_SECRET_REQUIRED_4821";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		let err = require_secret_env(var).unwrap_err();
		let message = err.to_string();
		assert!(message.contains(var));
		assert!(message.contains(&format!("{var}_FILE")));
	}
}
