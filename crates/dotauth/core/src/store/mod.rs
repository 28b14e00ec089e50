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

//! Transactional execution of rendered queries

use crate::error::StoreResult;
use crate::query::Query;
use async_trait::async_trait;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{PgDatabase, PgTransaction};

/// Runs rendered statements
#[async_trait]
pub trait Executor: Send {
    /// Execute a statement, returning the number of affected rows
    async fn execute(&mut self, query: &Query) -> StoreResult<u64>;

    /// Run a query producing a single boolean column in a single row
    async fn exists(&mut self, query: &Query) -> StoreResult<bool>;
}

/// Unit of work. Dropping it without `commit` rolls it back.
#[async_trait]
pub trait Transaction: Executor {
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Source of transactions
#[async_trait]
pub trait Database: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>>;
}
