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

//! Repository mocks and fixtures shared by the test suites

use crate::actor::Actor;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use dotauth_common::{Permission, Permissions, SubjectId};
use dotauth_core::repository::{
    GroupCriteria, GroupEntity, GroupRepository, NewGroup, NewUser, PermissionCriteria, PermissionEntity, PermissionRepository,
    RelationRepository, UserCriteria, UserEntity, UserRepository,
};
use dotauth_core::{Session, SessionToken, StoreResult, SyncOutcome};
use mockall::mock;
use std::collections::HashMap;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn find_one_by_id(&self, id: i64) -> StoreResult<UserEntity>;
        async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<UserEntity>>;
        async fn insert(&self, user: &NewUser) -> StoreResult<UserEntity>;
    }
}

mock! {
    pub GroupRepo {}

    #[async_trait]
    impl GroupRepository for GroupRepo {
        async fn find_one_by_id(&self, id: i64) -> StoreResult<GroupEntity>;
        async fn find(&self, criteria: &GroupCriteria) -> StoreResult<Vec<GroupEntity>>;
        async fn insert(&self, group: &NewGroup) -> StoreResult<GroupEntity>;
    }
}

mock! {
    pub PermissionRepo {}

    #[async_trait]
    impl PermissionRepository for PermissionRepo {
        async fn find_one_by_id(&self, id: i64) -> StoreResult<PermissionEntity>;
        async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Vec<PermissionEntity>>;
        async fn find(&self, criteria: &PermissionCriteria) -> StoreResult<Vec<PermissionEntity>>;
        async fn register(&self, permissions: &Permissions) -> StoreResult<u64>;
    }
}

mock! {
    pub RelationRepo {}

    #[async_trait]
    impl RelationRepository for RelationRepo {
        async fn set(&self, id: i64, ids: &[i64]) -> StoreResult<SyncOutcome>;
    }
}

pub fn user(id: i64, is_superuser: bool) -> UserEntity {
    UserEntity {
        id,
        username: format!("user{id}"),
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        is_superuser,
        is_active: true,
        is_staff: false,
        is_confirmed: true,
        last_login_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn group(id: i64, name: &str) -> GroupEntity {
    GroupEntity {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn permission(id: i64, permission: &Permission) -> PermissionEntity {
    let (subsystem, module, action) = permission.split();
    PermissionEntity {
        id,
        subsystem: subsystem.to_string(),
        module: module.to_string(),
        action: action.to_string(),
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn actor(id: i64, is_superuser: bool, permissions: Permissions) -> Actor {
    Actor {
        user: user(id, is_superuser),
        session: Session {
            token: SessionToken::generate(),
            subject_id: SubjectId::for_user(id),
            bag: HashMap::new(),
            expire_at: Utc::now() + Duration::hours(1),
        },
        permissions,
    }
}
