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

//! Request principal resolution
//!
//! Every request resolves its actor from the stores of record; nothing is
//! cached between requests, so revoked permissions apply on the next call.

use crate::error::{ApiError, ApiResult};
use dotauth_common::Permissions;
use dotauth_core::repository::{PermissionEntity, PermissionRepository, UserEntity, UserRepository};
use dotauth_core::session::TOKEN_METADATA_KEY;
use dotauth_core::{Session, SessionError, SessionStore, SessionToken};
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tracing::{debug, instrument};

/// Resolved principal of a single request
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: UserEntity,
    pub session: Session,
    pub permissions: Permissions,
}

impl Actor {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn is_superuser(&self) -> bool {
        self.user.is_superuser
    }
}

/// Turns a session token into an [`Actor`]
#[derive(Clone)]
pub struct ActorResolver {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl ActorResolver {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserRepository>, permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { sessions, users, permissions }
    }

    /// Extract the session token from request metadata
    pub fn token(metadata: &MetadataMap) -> ApiResult<SessionToken> {
        let value = metadata
            .get(TOKEN_METADATA_KEY)
            .ok_or_else(|| ApiError::unauthenticated("missing session token in metadata"))?;
        let raw = value.to_str().map_err(|_| ApiError::unauthenticated("session token is not valid ascii"))?;

        let token = SessionToken::decode(raw);
        if token.is_empty() {
            return Err(ApiError::unauthenticated("empty session token in metadata"));
        }
        Ok(token)
    }

    #[instrument(skip_all)]
    pub async fn resolve(&self, metadata: &MetadataMap) -> ApiResult<Actor> {
        let token = Self::token(metadata)?;

        let session = self.sessions.get(&token).await.map_err(|err| match err {
            SessionError::NotFound => ApiError::unauthenticated(format!("action cannot be performed: {err}")),
            other => ApiError::from(other),
        })?;

        let user_id = session.subject_id.user_id()?;
        let user = self.users.find_one_by_id(user_id).await?;
        let permissions: Permissions = self.permissions.find_by_user_id(user_id).await?.iter().map(PermissionEntity::permission).collect();

        debug!(user_id, permissions = permissions.len(), "Actor resolved");
        Ok(Actor { user, session, permissions })
    }
}
