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

//! Permission handlers

use super::{RpcServer, positive, respond};
use crate::actor::Actor;
use crate::error::ApiResult;
use crate::firewall::Guarded;
use crate::models::{
    GetPermissionRequest, GetPermissionResponse, ListPermissionsRequest, ListPermissionsResponse, ListUserPermissionsRequest,
    ListUserPermissionsResponse,
};
use dotauth_common::{Permission, catalog};
use dotauth_core::repository::PermissionCriteria;
use tonic::{Request, Response, Status};
use tracing::{debug, field, instrument};

impl Guarded for GetPermissionRequest {
    fn denial(&self) -> &'static str {
        "permission cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::PERMISSION_CAN_RETRIEVE]
    }
}

impl Guarded for ListPermissionsRequest {
    fn denial(&self) -> &'static str {
        "list of permissions cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::PERMISSION_CAN_RETRIEVE]
    }
}

impl Guarded for ListUserPermissionsRequest {
    fn denial(&self) -> &'static str {
        "list of user permissions cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::USER_PERMISSION_CAN_RETRIEVE]
    }
}

impl RpcServer {
    #[instrument(skip_all, fields(operation = "get_permission", user_id = field::Empty, permission_id = request.get_ref().id))]
    pub async fn get_permission(&self, request: Request<GetPermissionRequest>) -> Result<Response<GetPermissionResponse>, Status> {
        respond("get_permission", self.handle_get_permission(request).await)
    }

    async fn handle_get_permission(&self, request: Request<GetPermissionRequest>) -> ApiResult<GetPermissionResponse> {
        let (metadata, _, message) = request.into_parts();
        positive(message.id, "permission id")?;
        self.authorize(&metadata, &message).await?;

        let entity = self.repository.permissions.find_one_by_id(message.id).await?;
        Ok(GetPermissionResponse {
            permission: entity.permission().to_string(),
        })
    }

    #[instrument(skip_all, fields(operation = "list_permissions", user_id = field::Empty))]
    pub async fn list_permissions(&self, request: Request<ListPermissionsRequest>) -> Result<Response<ListPermissionsResponse>, Status> {
        respond("list_permissions", self.handle_list_permissions(request).await)
    }

    async fn handle_list_permissions(&self, request: Request<ListPermissionsRequest>) -> ApiResult<ListPermissionsResponse> {
        let (metadata, _, message) = request.into_parts();
        self.authorize(&metadata, &message).await?;

        let (offset, limit) = self.page(message.offset, message.limit);
        let criteria = PermissionCriteria {
            offset,
            limit,
            subsystem: message.subsystem,
            module: message.module,
            action: message.action,
        };

        let entities = self.repository.permissions.find(&criteria).await?;
        debug!(results = entities.len(), "Permissions retrieved");
        Ok(ListPermissionsResponse {
            permissions: entities.iter().map(|entity| entity.permission().to_string()).collect(),
        })
    }

    #[instrument(skip_all, fields(operation = "list_user_permissions", user_id = field::Empty, target_id = request.get_ref().id))]
    pub async fn list_user_permissions(
        &self,
        request: Request<ListUserPermissionsRequest>,
    ) -> Result<Response<ListUserPermissionsResponse>, Status> {
        respond("list_user_permissions", self.handle_list_user_permissions(request).await)
    }

    async fn handle_list_user_permissions(&self, request: Request<ListUserPermissionsRequest>) -> ApiResult<ListUserPermissionsResponse> {
        let (metadata, _, message) = request.into_parts();
        positive(message.id, "user id")?;
        self.authorize(&metadata, &message).await?;

        let entities = self.repository.permissions.find_by_user_id(message.id).await?;
        debug!(results = entities.len(), "User permissions retrieved");
        Ok(ListUserPermissionsResponse {
            permissions: entities.iter().map(|entity| entity.permission().to_string()).collect(),
        })
    }
}
