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

use super::PermissionRepository;
use crate::error::{ComposeResult, StoreResult};
use crate::query::{self, Composer, OnConflict, Operator, Order, Query};
use crate::store::postgres::{BindArgs, fetch_all, fetch_one};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dotauth_common::{Permission, Permissions};
use sqlx::{PgPool, Postgres};
use tracing::{info, instrument};

pub const TABLE: &str = "permissions";

pub const COLUMNS: &[&str] = &["id", "subsystem", "module", "action", "created_at", "updated_at"];

/// Union of direct grants and grants inherited through group membership
const FIND_BY_USER_ID: &str = "SELECT p.id, p.subsystem, p.module, p.action, p.created_at, p.updated_at \
     FROM permissions AS p \
     WHERE p.id IN (SELECT up.permission_id FROM user_permissions AS up WHERE up.user_id = $1) \
     OR p.id IN (SELECT gp.permission_id FROM group_permissions AS gp \
     JOIN user_groups AS ug ON ug.group_id = gp.group_id WHERE ug.user_id = $1) \
     ORDER BY p.id";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PermissionEntity {
    pub id: i64,
    pub subsystem: String,
    pub module: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PermissionEntity {
    pub fn permission(&self) -> Permission {
        Permission::from_parts(&self.subsystem, &self.module, &self.action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCriteria {
    pub offset: i64,
    pub limit: i64,
    pub subsystem: Option<String>,
    pub module: Option<String>,
    pub action: Option<String>,
}

impl PermissionCriteria {
    fn query(&self) -> ComposeResult<Query> {
        let mut filter = Composer::paginated(self.offset, self.limit);
        filter
            .push_opt("subsystem", Operator::Eq, self.subsystem.clone())
            .push_opt("module", Operator::Eq, self.module.clone())
            .push_opt("action", Operator::Eq, self.action.clone());
        query::select(TABLE, COLUMNS, filter, &[Order::asc("id")])
    }
}

fn by_id(id: i64) -> ComposeResult<Query> {
    let mut filter = Composer::paginated(0, 1);
    filter.push("id", Operator::Eq, id);
    query::select(TABLE, COLUMNS, filter, &[])
}

fn register_query(permission: &Permission) -> ComposeResult<Query> {
    let (subsystem, module, action) = permission.split();
    let mut values = Composer::new();
    values.set("subsystem", subsystem).set("module", module).set("action", action);
    query::insert(TABLE, values, OnConflict::Ignore, &[])
}

#[derive(Debug, Clone)]
pub struct PgPermissionRepository {
    pool: PgPool,
}

impl PgPermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    #[instrument(skip(self))]
    async fn find_one_by_id(&self, id: i64) -> StoreResult<PermissionEntity> {
        fetch_one(&self.pool, &by_id(id)?, "permission").await
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Vec<PermissionEntity>> {
        let query = Query { sql: FIND_BY_USER_ID.to_string(), args: vec![user_id.into()] };
        fetch_all(&self.pool, &query).await
    }

    #[instrument(skip(self))]
    async fn find(&self, criteria: &PermissionCriteria) -> StoreResult<Vec<PermissionEntity>> {
        fetch_all(&self.pool, &criteria.query()?).await
    }

    #[instrument(skip(self, permissions), fields(count = permissions.len()))]
    async fn register(&self, permissions: &Permissions) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut created = 0;

        for permission in permissions.iter().filter(|permission| !permission.is_empty()) {
            let query = register_query(permission)?;
            created += sqlx::query::<Postgres>(&query.sql).bind_args(&query.args).execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        info!(created, untouched = (permissions.len() as u64).saturating_sub(created), "Registered permissions");
        Ok(created)
    }
}
