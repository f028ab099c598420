// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication for weat admin endpoints.
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Bearer token → decode header (kid) → JWKS lookup → RS256 verify → CognitoClaims
//!                                                    │
//!                                                    └── unknown kid → refetch JWKS once
//! ```
//!
//! Admin access additionally requires the configured group in the
//! `cognito:groups` claim; see [`require_group`].
//!
//! Token values are never logged; [`extract_bearer_token`] returns a
//! [`SecretString`](weat_common_config::SecretString).

pub mod bearer;
pub mod claims;
pub mod error;
pub mod jwks;
pub mod verifier;

pub use bearer::extract_bearer_token;
pub use claims::{require_group, CognitoClaims};
pub use error::AuthError;
pub use jwks::{JwksClient, KeySource, StaticKeySource};
pub use verifier::TokenVerifier;
