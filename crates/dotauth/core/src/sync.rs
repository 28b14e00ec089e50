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

//! Many-to-many synchronization
//!
//! Makes the set of rows owned by one entity in a join table equal to a
//! requested id list: missing pairs are inserted, surplus pairs deleted, and
//! existing pairs left alone. Everything runs in a single transaction.

use crate::error::{ComposeResult, StoreError, StoreResult};
use crate::query::{self, Composer, OnConflict, Operator, Query};
use crate::store::{Database, Transaction};

/// Most ids one request may link: the bulk delete binds the owner id plus every kept id,
/// and Postgres accepts at most `u16::MAX` bind parameters per statement.
pub const MAX_IDS: usize = u16::MAX as usize - 1;

/// Join table keyed by `(column1, column2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub table: &'static str,
    pub column1: &'static str,
    pub column2: &'static str,
}

pub const USER_GROUPS: Relation = Relation {
    table: "user_groups",
    column1: "user_id",
    column2: "group_id",
};

pub const USER_PERMISSIONS: Relation = Relation {
    table: "user_permissions",
    column1: "user_id",
    column2: "permission_id",
};

pub const GROUP_PERMISSIONS: Relation = Relation {
    table: "group_permissions",
    column1: "group_id",
    column2: "permission_id",
};

impl Relation {
    fn exists_query(&self, id: i64, other: i64) -> ComposeResult<Query> {
        let mut filter = Composer::new();
        filter.push(self.column1, Operator::Eq, id).push(self.column2, Operator::Eq, other);
        query::exists(self.table, filter)
    }

    fn insert_query(&self, id: i64, other: i64) -> ComposeResult<Query> {
        let mut values = Composer::new();
        values.set(self.column1, id).set(self.column2, other);
        query::insert(self.table, values, OnConflict::Ignore, &[])
    }

    fn delete_query(&self, id: i64, keep: &[i64]) -> ComposeResult<Query> {
        query::delete_except(self.table, self.column1, id, self.column2, keep)
    }
}

/// Row counts produced by a synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub inserted: u64,
    pub deleted: u64,
}

impl SyncOutcome {
    /// Requested ids that needed no insert
    pub fn untouched(&self, requested: usize) -> u64 {
        (requested as u64).saturating_sub(self.inserted)
    }
}

/// Make the rows of `relation` owned by `id` equal to `ids`.
///
/// Either every change is committed or none is. A future dropped before
/// completion drops the open transaction, which rolls it back.
pub async fn synchronize(db: &dyn Database, relation: Relation, id: i64, ids: &[i64]) -> StoreResult<SyncOutcome> {
    let mut tx = db.begin().await?;

    match reconcile(&mut *tx, relation, id, ids).await {
        Ok(outcome) => {
            tx.commit().await?;
            Ok(outcome)
        }
        Err(err) => {
            // Reported error wins; the driver discards a transaction whose rollback failed
            let _ = tx.rollback().await;
            Err(err)
        }
    }
}

async fn reconcile(tx: &mut dyn Transaction, relation: Relation, id: i64, ids: &[i64]) -> StoreResult<SyncOutcome> {
    let mut outcome = SyncOutcome::default();

    for &other in ids {
        if tx.exists(&relation.exists_query(id, other)?).await? {
            continue;
        }

        // A concurrent writer may commit the same pair after the existence check.
        // Postgres reports that as zero affected rows through ON CONFLICT DO NOTHING;
        // a reported violation would already have aborted a Postgres transaction,
        // so the arm below only serves executors that keep the transaction usable.
        match tx.execute(&relation.insert_query(id, other)?).await {
            Ok(affected) => outcome.inserted += affected,
            Err(StoreError::UniqueViolation { .. }) => {}
            Err(err) => return Err(err),
        }
    }

    outcome.deleted = tx.execute(&relation.delete_query(id, ids)?).await?;
    Ok(outcome)
}
