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

//! In-memory join table for exercising transactional code in tests.
//!
//! Understands the three statement shapes rendered for a join table:
//! `SELECT EXISTS`, `INSERT` and `DELETE ... NOT IN`. Rows are `(id, other)`
//! pairs with a uniqueness constraint on the pair. Statements run against a
//! staged copy that replaces the committed rows on commit.

use super::{Database, Executor, Transaction};
use crate::error::{StoreError, StoreResult};
use crate::query::{Arg, Query};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

type Rows = BTreeSet<(i64, i64)>;

#[derive(Debug, Default)]
struct State {
    rows: Rows,
    /// Rows committed by a concurrent writer: present for uniqueness, invisible to `EXISTS`
    hidden: Rows,
    fail_on: Option<&'static str>,
    stall_on: Option<&'static str>,
    strict_conflicts: bool,
    commits: usize,
    rollbacks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<State>>,
}

impl MemoryDatabase {
    pub fn with_rows(rows: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let db = Self::default();
        db.state.lock().unwrap().rows.extend(rows);
        db
    }

    pub fn rows(&self) -> Vec<(i64, i64)> {
        self.state.lock().unwrap().rows.iter().copied().collect()
    }

    pub fn others(&self, id: i64) -> Vec<i64> {
        self.state.lock().unwrap().rows.iter().filter(|(owner, _)| *owner == id).map(|(_, other)| *other).collect()
    }

    /// Make every statement whose SQL starts with `prefix` fail
    pub fn fail_on(&self, prefix: &'static str) {
        self.state.lock().unwrap().fail_on = Some(prefix);
    }

    /// Make every statement whose SQL starts with `prefix` wait forever
    pub fn stall_on(&self, prefix: &'static str) {
        self.state.lock().unwrap().stall_on = Some(prefix);
    }

    /// Simulate a row committed by a concurrent writer after our existence check
    pub fn race(&self, id: i64, other: i64) {
        let mut state = self.state.lock().unwrap();
        state.rows.insert((id, other));
        state.hidden.insert((id, other));
    }

    /// Report conflicting inserts as unique violations even with `ON CONFLICT DO NOTHING`
    pub fn strict_conflicts(&self) {
        self.state.lock().unwrap().strict_conflicts = true;
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let staged = self.state.lock().unwrap().rows.clone();
        Ok(Box::new(MemoryTransaction { db: self.clone(), staged }))
    }
}

pub struct MemoryTransaction {
    db: MemoryDatabase,
    staged: Rows,
}

fn int(args: &[Arg], position: usize) -> StoreResult<i64> {
    match args.get(position) {
        Some(Arg::Int(value)) => Ok(*value),
        other => Err(StoreError::Database(sqlx::Error::Protocol(format!("expected integer argument at {position}, got {other:?}")))),
    }
}

#[async_trait]
impl Executor for MemoryTransaction {
    async fn execute(&mut self, query: &Query) -> StoreResult<u64> {
        let (fail_on, stall_on, strict, hidden) = {
            let state = self.db.state.lock().unwrap();
            (state.fail_on, state.stall_on, state.strict_conflicts, state.hidden.clone())
        };
        if stall_on.is_some_and(|prefix| query.sql.starts_with(prefix)) {
            std::future::pending::<()>().await;
        }
        if fail_on.is_some_and(|prefix| query.sql.starts_with(prefix)) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        if query.sql.starts_with("INSERT") {
            let row = (int(&query.args, 0)?, int(&query.args, 1)?);
            if self.staged.contains(&row) {
                if strict || (hidden.contains(&row) && !query.sql.contains("ON CONFLICT DO NOTHING")) {
                    return Err(StoreError::UniqueViolation { constraint: "pkey".to_string() });
                }
                return Ok(0);
            }
            self.staged.insert(row);
            Ok(1)
        } else if query.sql.starts_with("DELETE") {
            let id = int(&query.args, 0)?;
            let keep = (1..query.args.len()).map(|position| int(&query.args, position)).collect::<StoreResult<Vec<_>>>()?;
            let before = self.staged.len();
            self.staged.retain(|(owner, other)| *owner != id || keep.contains(other));
            Ok((before - self.staged.len()) as u64)
        } else {
            Err(StoreError::Database(sqlx::Error::Protocol(format!("unsupported statement: {}", query.sql))))
        }
    }

    async fn exists(&mut self, query: &Query) -> StoreResult<bool> {
        let state = self.db.state.lock().unwrap();
        if state.fail_on.is_some_and(|prefix| query.sql.starts_with(prefix)) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        let row = (int(&query.args, 0)?, int(&query.args, 1)?);
        Ok(self.staged.contains(&row) && !state.hidden.contains(&row))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { db, staged } = *self;
        let mut state = db.state.lock().unwrap();
        state.rows = staged;
        state.hidden.clear();
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.db.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}
