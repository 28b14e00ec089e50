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

use super::GroupRepository;
use crate::error::{ComposeResult, StoreResult};
use crate::query::{self, Composer, OnConflict, Operator, Order, Query};
use crate::store::postgres::{fetch_all, fetch_one};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

pub const TABLE: &str = "groups";

pub const COLUMNS: &[&str] = &["id", "name", "description", "created_at", "updated_at"];

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupCriteria {
    pub offset: i64,
    pub limit: i64,
}

impl GroupCriteria {
    fn query(&self) -> ComposeResult<Query> {
        query::select(TABLE, COLUMNS, Composer::paginated(self.offset, self.limit), &[Order::asc("id")])
    }
}

impl NewGroup {
    fn query(&self) -> ComposeResult<Query> {
        let mut values = Composer::new();
        values.set("name", self.name.as_str()).set_opt("description", self.description.clone());
        query::insert(TABLE, values, OnConflict::Fail, COLUMNS)
    }
}

fn by_id(id: i64) -> ComposeResult<Query> {
    let mut filter = Composer::paginated(0, 1);
    filter.push("id", Operator::Eq, id);
    query::select(TABLE, COLUMNS, filter, &[])
}

#[derive(Debug, Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    #[instrument(skip(self))]
    async fn find_one_by_id(&self, id: i64) -> StoreResult<GroupEntity> {
        fetch_one(&self.pool, &by_id(id)?, "group").await
    }

    #[instrument(skip(self))]
    async fn find(&self, criteria: &GroupCriteria) -> StoreResult<Vec<GroupEntity>> {
        fetch_all(&self.pool, &criteria.query()?).await
    }

    #[instrument(skip(self))]
    async fn insert(&self, group: &NewGroup) -> StoreResult<GroupEntity> {
        fetch_one(&self.pool, &group.query()?, "group").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Arg;

    #[test]
    fn test_find_pages_by_id() {
        let query = GroupCriteria { offset: 0, limit: 10 }.query().unwrap();
        assert_eq!(query.sql, "SELECT id,name,description,created_at,updated_at FROM groups ORDER BY id ASC OFFSET $1 LIMIT $2");
        assert_eq!(query.args, vec![Arg::Int(0), Arg::Int(10)]);
    }

    #[test]
    fn test_insert_omits_missing_description() {
        let group = NewGroup { name: "admins".to_string(), description: None };
        let query = group.query().unwrap();
        assert_eq!(
            query.sql,
            "INSERT INTO groups (name) VALUES ($1) RETURNING id,name,description,created_at,updated_at"
        );

        let group = NewGroup { name: "admins".to_string(), description: Some("ops".to_string()) };
        assert!(group.query().unwrap().sql.starts_with("INSERT INTO groups (name,description) VALUES ($1,$2)"));
    }
}
