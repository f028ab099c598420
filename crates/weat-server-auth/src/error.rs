// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("missing bearer token")]
	MissingToken,

	#[error("invalid token: {0}")]
	InvalidToken(String),

	#[error("no signing key for kid {0}")]
	UnknownKey(String),

	#[error("failed to fetch JWKS: {0}")]
	JwksFetch(String),

	#[error("token verification is not configured")]
	NotConfigured,

	#[error("user is not a member of group {0}")]
	NotInGroup(String),
}

impl AuthError {
	/// True for failures that mean "not authenticated" rather than
	/// "authenticated but not allowed".
	pub fn is_unauthenticated(&self) -> bool {
		!matches!(self, AuthError::NotInGroup(_))
	}
}
