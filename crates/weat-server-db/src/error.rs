// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

/// Which kind of integrity constraint a statement or commit tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
	Unique,
	ForeignKey,
	NotNull,
	Check,
	Other,
}

impl IntegrityKind {
	/// Map a PostgreSQL SQLSTATE to an integrity kind. Only class 23 codes match.
	pub fn from_sqlstate(code: &str) -> Option<Self> {
		match code {
			"23505" => Some(IntegrityKind::Unique),
			"23503" => Some(IntegrityKind::ForeignKey),
			"23502" => Some(IntegrityKind::NotNull),
			"23514" => Some(IntegrityKind::Check),
			c if c.starts_with("23") => Some(IntegrityKind::Other),
			_ => None,
		}
	}
}

impl fmt::Display for IntegrityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			IntegrityKind::Unique => "unique",
			IntegrityKind::ForeignKey => "foreign key",
			IntegrityKind::NotNull => "not null",
			IntegrityKind::Check => "check",
			IntegrityKind::Other => "integrity",
		};
		f.write_str(s)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Integrity violation ({kind}): {message}")]
	Integrity {
		kind: IntegrityKind,
		constraint: Option<String>,
		message: String,
	},

	#[error("Invalid sort column: {0}")]
	InvalidSortColumn(String),

	#[error("Invalid similarity threshold: {0}")]
	InvalidSimilarityThreshold(f64),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// True when this is a unique violation on the named constraint.
	pub fn is_unique_violation_on(&self, name: &str) -> bool {
		matches!(
			self,
			DbError::Integrity {
				kind: IntegrityKind::Unique,
				constraint: Some(c),
				..
			} if c == name
		)
	}

	pub fn is_integrity(&self) -> bool {
		matches!(self, DbError::Integrity { .. })
	}
}

impl From<sqlx::Error> for DbError {
	fn from(err: sqlx::Error) -> Self {
		if let Some(db) = err.as_database_error() {
			if let Some(kind) = db.code().as_deref().and_then(IntegrityKind::from_sqlstate) {
				return DbError::Integrity {
					kind,
					constraint: db.constraint().map(str::to_string),
					message: db.message().to_string(),
				};
			}
		}
		DbError::Sqlx(err)
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
