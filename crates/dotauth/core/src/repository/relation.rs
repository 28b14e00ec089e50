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

use super::RelationRepository;
use crate::error::StoreResult;
use crate::store::Database;
use crate::sync::{self, GROUP_PERMISSIONS, Relation, SyncOutcome, USER_GROUPS, USER_PERMISSIONS};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// Join table repository backed by the synchronizer
#[derive(Clone)]
pub struct ManyToManyRepository {
    db: Arc<dyn Database>,
    relation: Relation,
}

impl ManyToManyRepository {
    pub fn new(db: Arc<dyn Database>, relation: Relation) -> Self {
        Self { db, relation }
    }

    pub fn user_groups(db: Arc<dyn Database>) -> Self {
        Self::new(db, USER_GROUPS)
    }

    pub fn user_permissions(db: Arc<dyn Database>) -> Self {
        Self::new(db, USER_PERMISSIONS)
    }

    pub fn group_permissions(db: Arc<dyn Database>) -> Self {
        Self::new(db, GROUP_PERMISSIONS)
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }
}

#[async_trait]
impl RelationRepository for ManyToManyRepository {
    #[instrument(skip(self, ids), fields(table = self.relation.table, requested = ids.len()))]
    async fn set(&self, id: i64, ids: &[i64]) -> StoreResult<SyncOutcome> {
        let outcome = sync::synchronize(self.db.as_ref(), self.relation, id, ids).await?;
        info!(inserted = outcome.inserted, deleted = outcome.deleted, "Relation synchronized");
        Ok(outcome)
    }
}
