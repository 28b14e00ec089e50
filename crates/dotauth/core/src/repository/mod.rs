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

//! Entity repositories

pub mod group;
pub mod permission;
pub mod relation;
pub mod user;

pub use group::{GroupCriteria, GroupEntity, NewGroup, PgGroupRepository};
pub use permission::{PermissionCriteria, PermissionEntity, PgPermissionRepository};
pub use relation::ManyToManyRepository;
pub use user::{NewUser, PgUserRepository, UserCriteria, UserEntity};

use crate::error::StoreResult;
use crate::sync::SyncOutcome;
use async_trait::async_trait;
use dotauth_common::Permissions;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_one_by_id(&self, id: i64) -> StoreResult<UserEntity>;

    async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<UserEntity>>;

    async fn insert(&self, user: &NewUser) -> StoreResult<UserEntity>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_one_by_id(&self, id: i64) -> StoreResult<GroupEntity>;

    async fn find(&self, criteria: &GroupCriteria) -> StoreResult<Vec<GroupEntity>>;

    async fn insert(&self, group: &NewGroup) -> StoreResult<GroupEntity>;
}

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_one_by_id(&self, id: i64) -> StoreResult<PermissionEntity>;

    /// Permissions granted directly to the user or through any of its groups
    async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Vec<PermissionEntity>>;

    async fn find(&self, criteria: &PermissionCriteria) -> StoreResult<Vec<PermissionEntity>>;

    /// Insert missing permissions, returning how many were new
    async fn register(&self, permissions: &Permissions) -> StoreResult<u64>;
}

/// One side of a many-to-many relation
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Replace the ids linked to `id` with `ids`
    async fn set(&self, id: i64, ids: &[i64]) -> StoreResult<SyncOutcome>;
}
