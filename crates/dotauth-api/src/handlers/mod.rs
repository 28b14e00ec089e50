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

//! RPC handlers
//!
//! Every operation runs the same pipeline: validate input, resolve the actor,
//! pass the firewall, then call the repository layer.

pub mod group;
pub mod permission;
pub mod relation;
pub mod user;


use crate::actor::{Actor, ActorResolver};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::firewall::{self, Guarded};
use dotauth_core::{MemorySessionStore, SessionStore};
use dotauth_core::repository::{
    GroupRepository, ManyToManyRepository, PermissionRepository, PgGroupRepository, PgPermissionRepository, PgUserRepository,
    RelationRepository, UserRepository,
};
use dotauth_core::store::PgDatabase;
use metrics::counter;
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tonic::{Code, Response, Status};
use tracing::{Span, warn};

/// Repository collaborators used by the handlers
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub permissions: Arc<dyn PermissionRepository>,
    pub user_groups: Arc<dyn RelationRepository>,
    pub user_permissions: Arc<dyn RelationRepository>,
    pub group_permissions: Arc<dyn RelationRepository>,
}

impl Repositories {
    /// PostgreSQL backed repositories sharing one pool
    pub fn postgres(db: PgDatabase) -> Self {
        let pool = db.pool().clone();
        let db = Arc::new(db);

        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            groups: Arc::new(PgGroupRepository::new(pool.clone())),
            permissions: Arc::new(PgPermissionRepository::new(pool)),
            user_groups: Arc::new(ManyToManyRepository::user_groups(db.clone())),
            user_permissions: Arc::new(ManyToManyRepository::user_permissions(db.clone())),
            group_permissions: Arc::new(ManyToManyRepository::group_permissions(db)),
        }
    }
}

/// Authority service RPC server
#[derive(Clone)]
pub struct RpcServer {
    config: Config,
    resolver: ActorResolver,
    repository: Repositories,
}

impl RpcServer {
    pub fn new(config: Config, sessions: Arc<dyn SessionStore>, repository: Repositories) -> Self {
        let resolver = ActorResolver::new(sessions, repository.users.clone(), repository.permissions.clone());
        Self { config, resolver, repository }
    }

    /// Server with a process local session store whose sessions live for `config.session_ttl()`
    pub fn with_memory_sessions(config: Config, repository: Repositories) -> (Self, Arc<MemorySessionStore>) {
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl()));
        (Self::new(config, sessions.clone(), repository), sessions)
    }

    /// Resolve the caller and run the operation's firewall
    async fn authorize<R: Guarded + Sync>(&self, metadata: &MetadataMap, request: &R) -> ApiResult<Actor> {
        let actor = self.resolver.resolve(metadata).await?;
        Span::current().record("user_id", actor.user_id());

        firewall::check(request, &actor)?;
        Ok(actor)
    }

    fn page(&self, offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
        self.config.page(offset, limit)
    }
}

/// Reject identifiers below 1 before any I/O
fn positive(id: i64, name: &str) -> ApiResult<()> {
    if id < 1 {
        return Err(ApiError::invalid_argument(format!("{name} needs to be greater than zero")));
    }
    Ok(())
}

/// Count the outcome and convert errors into a status
fn respond<T>(operation: &'static str, result: ApiResult<T>) -> Result<Response<T>, Status> {
    match result {
        Ok(message) => {
            counter!("dotauth_requests_total", 1, "operation" => operation, "outcome" => "ok");
            Ok(Response::new(message))
        }
        Err(err) => {
            counter!("dotauth_requests_total", 1, "operation" => operation, "outcome" => err.error_type());
            if !matches!(err.code(), Code::Internal | Code::Unavailable) {
                warn!(operation, error = %err, "Request rejected");
            }
            Err(err.into())
        }
    }
}
