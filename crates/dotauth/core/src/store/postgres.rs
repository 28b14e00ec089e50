// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Postgres backed store

use super::{Database, Executor, Transaction};
use crate::error::{StoreError, StoreResult};
use crate::query::{Arg, Query};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres};
use tracing::{debug, info};

/// Binds composed arguments to a sqlx query in placeholder order
pub(crate) trait BindArgs<'q>: Sized {
    fn bind_arg(self, arg: &'q Arg) -> Self;

    fn bind_args(self, args: &'q [Arg]) -> Self {
        args.iter().fold(self, |query, arg| query.bind_arg(arg))
    }
}

impl<'q> BindArgs<'q> for sqlx::query::Query<'q, Postgres, PgArguments> {
    fn bind_arg(self, arg: &'q Arg) -> Self {
        match arg {
            Arg::Int(value) => self.bind(*value),
            Arg::Text(value) => self.bind(value.as_str()),
            Arg::Bool(value) => self.bind(*value),
            Arg::Timestamp(value) => self.bind(*value),
        }
    }
}

impl<'q, O> BindArgs<'q> for sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_arg(self, arg: &'q Arg) -> Self {
        match arg {
            Arg::Int(value) => self.bind(*value),
            Arg::Text(value) => self.bind(value.as_str()),
            Arg::Bool(value) => self.bind(*value),
            Arg::Timestamp(value) => self.bind(*value),
        }
    }
}

/// Fetch every row of a rendered select
pub(crate) async fn fetch_all<O>(pool: &PgPool, query: &Query) -> StoreResult<Vec<O>>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    debug!(sql = %query.sql, args = query.args.len(), "fetch_all");
    Ok(sqlx::query_as::<Postgres, O>(&query.sql).bind_args(&query.args).fetch_all(pool).await?)
}

/// Fetch exactly one row, reporting `entity` when nothing matches
pub(crate) async fn fetch_one<O>(pool: &PgPool, query: &Query, entity: &'static str) -> StoreResult<O>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    debug!(sql = %query.sql, args = query.args.len(), "fetch_one");
    sqlx::query_as::<Postgres, O>(&query.sql)
        .bind_args(&query.args)
        .fetch_optional(pool)
        .await?
        .ok_or(StoreError::NotFound { entity })
}

/// Pooled Postgres connections
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        info!(max_connections, "Connected to Postgres");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let inner = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { inner }))
    }
}

/// Open Postgres transaction; sqlx rolls it back when dropped uncommitted
pub struct PgTransaction {
    inner: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Executor for PgTransaction {
    async fn execute(&mut self, query: &Query) -> StoreResult<u64> {
        let result = sqlx::query::<Postgres>(&query.sql).bind_args(&query.args).execute(&mut *self.inner).await?;
        Ok(result.rows_affected())
    }

    async fn exists(&mut self, query: &Query) -> StoreResult<bool> {
        let (exists,) = sqlx::query_as::<Postgres, (bool,)>(&query.sql).bind_args(&query.args).fetch_one(&mut *self.inner).await?;
        Ok(exists)
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        Ok(self.inner.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(self.inner.rollback().await?)
    }
}
