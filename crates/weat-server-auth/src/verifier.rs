// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument};

use crate::claims::CognitoClaims;
use crate::error::AuthError;
use crate::jwks::KeySource;

/// Verifies RS256 tokens issued by one user pool for one app client.
#[derive(Clone)]
pub struct TokenVerifier {
	keys: Arc<dyn KeySource>,
	validation: Validation,
}

impl TokenVerifier {
	pub fn new(keys: Arc<dyn KeySource>, client_id: &str, issuer: &str) -> Self {
		let mut validation = Validation::new(Algorithm::RS256);
		validation.set_audience(&[client_id]);
		validation.set_issuer(&[issuer]);
		Self { keys, validation }
	}

	/// Verify signature, expiry, audience and issuer, returning the claims.
	#[instrument(skip_all)]
	pub async fn verify(&self, token: &str) -> Result<CognitoClaims, AuthError> {
		let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
		let kid = header
			.kid
			.ok_or_else(|| AuthError::InvalidToken("token header has no kid".to_string()))?;

		let jwk = self
			.keys
			.find(&kid)
			.await?
			.ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;
		let key = DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

		let data = decode::<CognitoClaims>(token, &key, &self.validation)
			.map_err(|e| AuthError::InvalidToken(e.to_string()))?;

		debug!(sub = %data.claims.sub, kid = %kid, "token verified");
		Ok(data.claims)
	}
}

impl std::fmt::Debug for TokenVerifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenVerifier")
			.field("audience", &self.validation.aud)
			.field("issuer", &self.validation.iss)
			.finish()
	}
}
