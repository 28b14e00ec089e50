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

//! Handlers replacing the links of a user or group

use super::{RpcServer, positive, respond};
use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use crate::firewall::Guarded;
use crate::models::{SetGroupPermissionsRequest, SetRelationResponse, SetUserGroupsRequest, SetUserPermissionsRequest};
use dotauth_common::{Permission, catalog};
use dotauth_core::repository::RelationRepository;
use dotauth_core::sync::MAX_IDS;
use tonic::{Request, Response, Status};
use tracing::{field, info, instrument};

impl Guarded for SetUserGroupsRequest {
    fn denial(&self) -> &'static str {
        "user groups cannot be set"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::USER_GROUP_CAN_CREATE, catalog::USER_GROUP_CAN_DELETE]
    }
}

impl Guarded for SetUserPermissionsRequest {
    fn denial(&self) -> &'static str {
        "user permissions cannot be set"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::USER_PERMISSION_CAN_CREATE, catalog::USER_PERMISSION_CAN_DELETE]
    }
}

impl Guarded for SetGroupPermissionsRequest {
    fn denial(&self) -> &'static str {
        "group permissions cannot be set"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::GROUP_PERMISSION_CAN_CREATE, catalog::GROUP_PERMISSION_CAN_DELETE]
    }
}

fn validate(id: i64, id_name: &str, ids: &[i64], ids_name: &str) -> ApiResult<()> {
    positive(id, id_name)?;
    if ids.len() > MAX_IDS {
        return Err(ApiError::invalid_argument(format!("at most {MAX_IDS} {ids_name}s can be set at once")));
    }
    ids.iter().try_for_each(|&other| positive(other, ids_name))
}

async fn set(repository: &dyn RelationRepository, id: i64, ids: &[i64]) -> ApiResult<SetRelationResponse> {
    let outcome = repository.set(id, ids).await?;
    let response = SetRelationResponse::new(outcome, ids.len());
    info!(
        id,
        created = response.created,
        removed = response.removed,
        untouched = response.untouched,
        "Relation set"
    );
    Ok(response)
}

impl RpcServer {
    #[instrument(skip_all, fields(operation = "set_user_groups", user_id = field::Empty, target_id = request.get_ref().user_id))]
    pub async fn set_user_groups(&self, request: Request<SetUserGroupsRequest>) -> Result<Response<SetRelationResponse>, Status> {
        respond("set_user_groups", self.handle_set_user_groups(request).await)
    }

    async fn handle_set_user_groups(&self, request: Request<SetUserGroupsRequest>) -> ApiResult<SetRelationResponse> {
        let (metadata, _, message) = request.into_parts();
        validate(message.user_id, "user id", &message.groups, "group id")?;
        self.authorize(&metadata, &message).await?;

        set(self.repository.user_groups.as_ref(), message.user_id, &message.groups).await
    }

    #[instrument(skip_all, fields(operation = "set_user_permissions", user_id = field::Empty, target_id = request.get_ref().user_id))]
    pub async fn set_user_permissions(&self, request: Request<SetUserPermissionsRequest>) -> Result<Response<SetRelationResponse>, Status> {
        respond("set_user_permissions", self.handle_set_user_permissions(request).await)
    }

    async fn handle_set_user_permissions(&self, request: Request<SetUserPermissionsRequest>) -> ApiResult<SetRelationResponse> {
        let (metadata, _, message) = request.into_parts();
        validate(message.user_id, "user id", &message.permissions, "permission id")?;
        self.authorize(&metadata, &message).await?;

        set(self.repository.user_permissions.as_ref(), message.user_id, &message.permissions).await
    }

    #[instrument(skip_all, fields(operation = "set_group_permissions", user_id = field::Empty, target_id = request.get_ref().group_id))]
    pub async fn set_group_permissions(&self, request: Request<SetGroupPermissionsRequest>) -> Result<Response<SetRelationResponse>, Status> {
        respond("set_group_permissions", self.handle_set_group_permissions(request).await)
    }

    async fn handle_set_group_permissions(&self, request: Request<SetGroupPermissionsRequest>) -> ApiResult<SetRelationResponse> {
        let (metadata, _, message) = request.into_parts();
        validate(message.group_id, "group id", &message.permissions, "permission id")?;
        self.authorize(&metadata, &message).await?;

        set(self.repository.group_permissions.as_ref(), message.group_id, &message.permissions).await
    }
}
