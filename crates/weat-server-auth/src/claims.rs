// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims of a Cognito-issued token that the server reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitoClaims {
	pub sub: String,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(rename = "cognito:username", default)]
	pub username: Option<String>,
	#[serde(rename = "cognito:groups", default)]
	pub groups: Vec<String>,
	pub exp: u64,
}

impl CognitoClaims {
	pub fn is_member_of(&self, group: &str) -> bool {
		self.groups.iter().any(|g| g == group)
	}
}

/// Fail with [`AuthError::NotInGroup`] unless `claims` lists `group`.
pub fn require_group(claims: &CognitoClaims, group: &str) -> Result<(), AuthError> {
	if claims.is_member_of(group) {
		Ok(())
	} else {
		Err(AuthError::NotInGroup(group.to_string()))
	}
}
