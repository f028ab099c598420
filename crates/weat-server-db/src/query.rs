// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query composition helpers.
//!
//! A [`Select`] is an owned plan: a base `SELECT ... FROM ...` plus filters,
//! grouping, ordering and a window. Every user-supplied value is carried as a
//! [`Value`] and bound as a parameter when the plan is written into a
//! [`QueryBuilder`]; nothing user-controlled is ever spliced into SQL text.
//!
//! The helpers [`sort`], [`paginate`] and [`with_similarity_threshold`]
//! compose on top of a plan the same way for every entity.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::uow::UnitOfWork;

/// A value bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Text(String),
	Float(f64),
	Uuid(Uuid),
	Uuids(Vec<Uuid>),
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<Uuid> for Value {
	fn from(v: Uuid) -> Self {
		Value::Uuid(v)
	}
}

impl From<Vec<Uuid>> for Value {
	fn from(v: Vec<Uuid>) -> Self {
		Value::Uuids(v)
	}
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
	Sql(String),
	Bind(Value),
}

/// A SQL fragment interleaving literal text and bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
	parts: Vec<Part>,
}

impl Expr {
	pub fn sql(text: impl Into<String>) -> Self {
		Self {
			parts: vec![Part::Sql(text.into())],
		}
	}

	pub fn push_sql(mut self, text: impl Into<String>) -> Self {
		self.parts.push(Part::Sql(text.into()));
		self
	}

	pub fn bind(mut self, value: impl Into<Value>) -> Self {
		self.parts.push(Part::Bind(value.into()));
		self
	}

	fn write(&self, qb: &mut QueryBuilder<'_, Postgres>) {
		for part in &self.parts {
			match part {
				Part::Sql(text) => {
					qb.push(text);
				}
				Part::Bind(Value::Text(v)) => {
					qb.push_bind(v.clone());
				}
				Part::Bind(Value::Float(v)) => {
					qb.push_bind(*v);
				}
				Part::Bind(Value::Uuid(v)) => {
					qb.push_bind(*v);
				}
				Part::Bind(Value::Uuids(v)) => {
					qb.push_bind(v.clone());
				}
			}
		}
	}
}

/// An owned SELECT plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
	base: String,
	filters: Vec<Expr>,
	group_by: Option<String>,
	order_by: Vec<Expr>,
	limit: Option<i64>,
	offset: Option<i64>,
}

impl Select {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			base: base.into(),
			filters: Vec::new(),
			group_by: None,
			order_by: Vec::new(),
			limit: None,
			offset: None,
		}
	}

	/// AND a predicate into the WHERE clause.
	pub fn filter(mut self, expr: Expr) -> Self {
		self.filters.push(expr);
		self
	}

	pub fn group_by(mut self, columns: impl Into<String>) -> Self {
		self.group_by = Some(columns.into());
		self
	}

	/// Append an ORDER BY term. Terms apply in the order they are added.
	pub fn order_by(mut self, expr: Expr) -> Self {
		self.order_by.push(expr);
		self
	}

	pub fn limit(mut self, limit: i64) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn offset(mut self, offset: i64) -> Self {
		self.offset = Some(offset);
		self
	}

	/// Write the full plan into `qb`.
	pub fn write(&self, qb: &mut QueryBuilder<'_, Postgres>) {
		self.write_where(qb);
		if !self.order_by.is_empty() {
			qb.push(" ORDER BY ");
			for (i, expr) in self.order_by.iter().enumerate() {
				if i > 0 {
					qb.push(", ");
				}
				expr.write(qb);
			}
		}
		if let Some(limit) = self.limit {
			qb.push(" LIMIT ");
			qb.push_bind(limit);
		}
		if let Some(offset) = self.offset {
			qb.push(" OFFSET ");
			qb.push_bind(offset);
		}
	}

	/// Write the plan without ordering or window, as needed for counting.
	pub fn write_unpaged(&self, qb: &mut QueryBuilder<'_, Postgres>) {
		self.write_where(qb);
	}

	fn write_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
		qb.push(&self.base);
		for (i, expr) in self.filters.iter().enumerate() {
			qb.push(if i == 0 { " WHERE " } else { " AND " });
			expr.write(qb);
		}
		if let Some(group_by) = &self.group_by {
			qb.push(" GROUP BY ");
			qb.push(group_by);
		}
	}

	/// Render the SQL text with `$n` placeholders.
	pub fn to_sql(&self) -> String {
		let mut qb = QueryBuilder::new("");
		self.write(&mut qb);
		qb.sql().to_string()
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}

impl SortOrder {
	pub fn as_sql(&self) -> &'static str {
		match self {
			SortOrder::Asc => "ASC",
			SortOrder::Desc => "DESC",
		}
	}
}

impl FromStr for SortOrder {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"asc" => Ok(SortOrder::Asc),
			"desc" => Ok(SortOrder::Desc),
			_ => Err(format!("unknown sort order: {s}")),
		}
	}
}

/// A sortable column: the SQL expression and whether it compares as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumn {
	pub expr: &'static str,
	pub text: bool,
}

impl SortColumn {
	pub const fn plain(expr: &'static str) -> Self {
		Self { expr, text: false }
	}

	pub const fn text(expr: &'static str) -> Self {
		Self { expr, text: true }
	}
}

/// Per-entity allow-list of sortable attributes.
#[derive(Debug)]
pub struct SortColumns {
	tie_breaker: &'static str,
	columns: &'static [(&'static str, SortColumn)],
}

impl SortColumns {
	pub const fn new(
		tie_breaker: &'static str,
		columns: &'static [(&'static str, SortColumn)],
	) -> Self {
		Self {
			tie_breaker,
			columns,
		}
	}

	pub fn get(&self, name: &str) -> Option<SortColumn> {
		self.columns
			.iter()
			.find(|(n, _)| *n == name)
			.map(|(_, c)| *c)
	}

	/// Fail with `InvalidSortColumn` unless `name` is allow-listed.
	pub fn ensure(&self, name: &str) -> Result<SortColumn> {
		self.get(name)
			.ok_or_else(|| DbError::InvalidSortColumn(name.to_string()))
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.columns.iter().map(|(n, _)| *n)
	}

	/// Append the primary key ascending so equal keys page deterministically.
	pub fn tie_break(&self, select: Select) -> Select {
		select.order_by(Expr::sql(format!("{} ASC", self.tie_breaker)))
	}
}

/// Order `select` by the allow-listed attribute `sort_by`.
///
/// Text columns compare case-insensitively. The entity's primary key is
/// appended as a tie-break.
pub fn sort(
	select: Select,
	columns: &SortColumns,
	sort_by: &str,
	order: SortOrder,
) -> Result<Select> {
	let column = columns.ensure(sort_by)?;
	let term = if column.text {
		format!("lower({}) {}", column.expr, order.as_sql())
	} else {
		format!("{} {}", column.expr, order.as_sql())
	};
	Ok(columns.tie_break(select.order_by(Expr::sql(term))))
}

/// One page of results, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub page: u32,
	pub page_size: u32,
}

impl Page {
	pub fn new(page: u32, page_size: u32) -> Self {
		Self { page, page_size }
	}

	pub fn offset(&self) -> i64 {
		i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
	}

	pub fn limit(&self) -> i64 {
		i64::from(self.page_size)
	}
}

/// Restrict `select` to the rows of `page`.
pub fn paginate(select: Select, page: Page) -> Select {
	select.offset(page.offset()).limit(page.limit())
}

/// Set the pg_trgm similarity threshold for the rest of the current
/// transaction. Must be called before the statements that use `%`.
#[tracing::instrument(skip(uow))]
pub async fn with_similarity_threshold(uow: &mut UnitOfWork, threshold: f64) -> Result<()> {
	if !(0.0..=1.0).contains(&threshold) {
		return Err(DbError::InvalidSimilarityThreshold(threshold));
	}

	let conn = uow.connection().await?;
	sqlx::query("SELECT set_config('pg_trgm.similarity_threshold', $1, true)")
		.bind(threshold.to_string())
		.execute(&mut *conn)
		.await?;

	tracing::debug!(threshold, "similarity threshold applied");
	Ok(())
}
