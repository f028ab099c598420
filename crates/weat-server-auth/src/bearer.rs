// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::instrument;
use weat_common_config::SecretString;

/// Extract the token from an `Authorization: Bearer <token>` header.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<SecretString> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| SecretString::new(token.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	#[test]
	fn test_extracts_bearer_token() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
		let token = extract_bearer_token(&headers).unwrap();
		assert_eq!(token.expose(), "abc.def.ghi");
	}

	#[test]
	fn test_missing_header() {
		assert!(extract_bearer_token(&HeaderMap::new()).is_none());
	}

	#[test]
	fn test_other_scheme_ignored() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
		assert!(extract_bearer_token(&headers).is_none());
	}

	#[test]
	fn test_empty_bearer_ignored() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
		assert!(extract_bearer_token(&headers).is_none());
	}
}
