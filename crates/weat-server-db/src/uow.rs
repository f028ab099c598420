// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Unit of Work: one transaction per request.
//!
//! The transaction begins lazily on first use. `commit()` ends it; dropping a
//! [`UnitOfWork`] with an open transaction rolls it back and returns the
//! connection to the pool.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{DbError, Result};
use crate::query::{Expr, Select};

pub struct UnitOfWork {
	pool: PgPool,
	tx: Option<Transaction<'static, Postgres>>,
}

impl UnitOfWork {
	pub fn new(pool: PgPool) -> Self {
		Self { pool, tx: None }
	}

	/// True while a transaction is open.
	pub fn in_transaction(&self) -> bool {
		self.tx.is_some()
	}

	/// The connection of the current transaction, beginning one if needed.
	pub async fn connection(&mut self) -> Result<&mut PgConnection> {
		if self.tx.is_none() {
			self.tx = Some(self.pool.begin().await?);
			tracing::trace!("transaction started");
		}
		self.tx
			.as_deref_mut()
			.ok_or_else(|| DbError::Internal("transaction unavailable".to_string()))
	}

	#[tracing::instrument(skip(self), fields(entity = E::NAME))]
	pub async fn get<E: Entity>(&mut self, id: Uuid) -> Result<Option<E>> {
		let select = E::select().filter(Expr::sql(format!("{} = ", E::ID_COLUMN)).bind(id));
		let found = self.get_all::<E>(&select).await?.into_iter().next();
		tracing::debug!(found = found.is_some(), "entity lookup");
		Ok(found)
	}

	/// Run `select` and map every row, preserving query order.
	#[tracing::instrument(skip(self, select), fields(entity = E::NAME))]
	pub async fn get_all<E: Entity>(&mut self, select: &Select) -> Result<Vec<E>> {
		let mut qb = QueryBuilder::new("");
		select.write(&mut qb);

		let conn = self.connection().await?;
		let rows = qb.build().fetch_all(&mut *conn).await?;

		tracing::debug!(rows = rows.len(), "query executed");
		rows.iter().map(E::from_row).collect()
	}

	/// Count the rows `select` yields, ignoring its ordering and window.
	#[tracing::instrument(skip(self, select))]
	pub async fn get_count(&mut self, select: &Select) -> Result<i64> {
		let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM (");
		select.write_unpaged(&mut qb);
		qb.push(") AS counted");

		let conn = self.connection().await?;
		let count = qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

		tracing::debug!(count, "count executed");
		Ok(count)
	}

	/// Stage an insert or update of `entity`.
	#[tracing::instrument(skip(self, entity), fields(entity = E::NAME, id = %entity.id()))]
	pub async fn add<E: Entity>(&mut self, entity: &E) -> Result<()> {
		let conn = self.connection().await?;
		match entity.persist(conn).await {
			Ok(()) => {
				tracing::debug!("entity staged");
				Ok(())
			}
			Err(e) => {
				self.discard().await;
				Err(e.into())
			}
		}
	}

	/// Stage the deletion of `entity`.
	#[tracing::instrument(skip(self, entity), fields(entity = E::NAME, id = %entity.id()))]
	pub async fn delete<E: Entity>(&mut self, entity: &E) -> Result<()> {
		let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
		let conn = self.connection().await?;
		match sqlx::query(&sql).bind(entity.id()).execute(&mut *conn).await {
			Ok(result) => {
				tracing::debug!(rows = result.rows_affected(), "entity delete staged");
				Ok(())
			}
			Err(e) => {
				self.discard().await;
				Err(e.into())
			}
		}
	}

	/// Commit the open transaction. A no-op when nothing is open.
	///
	/// Deferred constraints are checked here; a violation comes back as
	/// [`DbError::Integrity`] and the transaction is already rolled back.
	#[tracing::instrument(skip(self))]
	pub async fn commit(&mut self) -> Result<()> {
		let Some(tx) = self.tx.take() else {
			tracing::trace!("nothing to commit");
			return Ok(());
		};

		match tx.commit().await {
			Ok(()) => {
				tracing::debug!("transaction committed");
				Ok(())
			}
			Err(e) => {
				let err = DbError::from(e);
				tracing::warn!(error = %err, "commit failed, transaction rolled back");
				Err(err)
			}
		}
	}

	#[tracing::instrument(skip(self))]
	pub async fn rollback(&mut self) -> Result<()> {
		if let Some(tx) = self.tx.take() {
			tx.rollback().await?;
			tracing::debug!("transaction rolled back");
		}
		Ok(())
	}

	/// Reload the persisted state of an entity, e.g. server-set timestamps.
	pub async fn refresh<E: Entity>(&mut self, id: Uuid) -> Result<E> {
		self.get::<E>(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("{}(id={id})", E::NAME)))
	}

	async fn discard(&mut self) {
		if let Some(tx) = self.tx.take() {
			if let Err(e) = tx.rollback().await {
				tracing::warn!(error = %e, "rollback after failed statement also failed");
			}
		}
	}
}

impl std::fmt::Debug for UnitOfWork {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UnitOfWork")
			.field("in_transaction", &self.in_transaction())
			.finish()
	}
}
