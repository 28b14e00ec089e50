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

use super::UserRepository;
use crate::error::{ComposeError, ComposeResult, StoreResult};
use crate::query::{self, Composer, OnConflict, Operator, Order, Query};
use crate::store::postgres::{fetch_all, fetch_one};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

pub const TABLE: &str = "users";

pub const COLUMNS: &[&str] = &[
    "id",
    "username",
    "first_name",
    "last_name",
    "is_superuser",
    "is_active",
    "is_staff",
    "is_confirmed",
    "last_login_at",
    "created_at",
    "updated_at",
];

/// Row of the `users` table. The password hash is never read back.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_confirmed: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    /// PHC formatted password hash
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    pub offset: i64,
    pub limit: i64,
    pub username: Option<String>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_confirmed: Option<bool>,
    pub sort: Vec<Order>,
}

impl UserCriteria {
    fn query(&self) -> ComposeResult<Query> {
        // Only readable columns are sortable; the password hash is not one of them
        if let Some(order) = self.sort.iter().find(|order| !COLUMNS.contains(&order.column.as_str())) {
            return Err(ComposeError::InvalidIdentifier(order.column.clone()));
        }

        let mut filter = Composer::paginated(self.offset, self.limit);
        filter
            .push_opt("username", Operator::ILike, self.username.clone())
            .push_opt("is_superuser", Operator::Eq, self.is_superuser)
            .push_opt("is_active", Operator::Eq, self.is_active)
            .push_opt("is_staff", Operator::Eq, self.is_staff)
            .push_opt("is_confirmed", Operator::Eq, self.is_confirmed);
        query::select(TABLE, COLUMNS, filter, &self.sort)
    }
}

impl NewUser {
    fn query(&self) -> ComposeResult<Query> {
        let mut values = Composer::new();
        values
            .set("username", self.username.as_str())
            .set("password", self.password.as_str())
            .set("first_name", self.first_name.as_str())
            .set("last_name", self.last_name.as_str())
            .set("is_superuser", self.is_superuser)
            .set("is_active", self.is_active)
            .set("is_staff", self.is_staff)
            .set("is_confirmed", self.is_confirmed);
        query::insert(TABLE, values, OnConflict::Fail, COLUMNS)
    }
}

fn by_id(id: i64) -> ComposeResult<Query> {
    let mut filter = Composer::paginated(0, 1);
    filter.push("id", Operator::Eq, id);
    query::select(TABLE, COLUMNS, filter, &[])
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_one_by_id(&self, id: i64) -> StoreResult<UserEntity> {
        fetch_one(&self.pool, &by_id(id)?, "user").await
    }

    #[instrument(skip(self))]
    async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<UserEntity>> {
        fetch_all(&self.pool, &criteria.query()?).await
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: &NewUser) -> StoreResult<UserEntity> {
        fetch_one(&self.pool, &user.query()?, "user").await
    }
}
