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

//! Group handlers

use super::{RpcServer, positive, respond};
use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use crate::firewall::Guarded;
use crate::models::{CreateGroupRequest, CreateGroupResponse, GetGroupRequest, GetGroupResponse, ListGroupsRequest, ListGroupsResponse};
use dotauth_common::{Permission, catalog};
use dotauth_core::repository::{GroupCriteria, NewGroup};
use tonic::{Request, Response, Status};
use tracing::{field, info, instrument};

impl Guarded for GetGroupRequest {
    fn denial(&self) -> &'static str {
        "group cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::GROUP_CAN_RETRIEVE]
    }
}

impl Guarded for ListGroupsRequest {
    fn denial(&self) -> &'static str {
        "list of groups cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::GROUP_CAN_RETRIEVE]
    }
}

impl Guarded for CreateGroupRequest {
    fn denial(&self) -> &'static str {
        "group cannot be created"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::GROUP_CAN_CREATE]
    }
}

impl RpcServer {
    #[instrument(skip_all, fields(operation = "get_group", user_id = field::Empty, group_id = request.get_ref().id))]
    pub async fn get_group(&self, request: Request<GetGroupRequest>) -> Result<Response<GetGroupResponse>, Status> {
        respond("get_group", self.handle_get_group(request).await)
    }

    async fn handle_get_group(&self, request: Request<GetGroupRequest>) -> ApiResult<GetGroupResponse> {
        let (metadata, _, message) = request.into_parts();
        positive(message.id, "group id")?;
        self.authorize(&metadata, &message).await?;

        let entity = self.repository.groups.find_one_by_id(message.id).await?;
        Ok(GetGroupResponse { group: entity.into() })
    }

    #[instrument(skip_all, fields(operation = "list_groups", user_id = field::Empty))]
    pub async fn list_groups(&self, request: Request<ListGroupsRequest>) -> Result<Response<ListGroupsResponse>, Status> {
        respond("list_groups", self.handle_list_groups(request).await)
    }

    async fn handle_list_groups(&self, request: Request<ListGroupsRequest>) -> ApiResult<ListGroupsResponse> {
        let (metadata, _, message) = request.into_parts();
        self.authorize(&metadata, &message).await?;

        let (offset, limit) = self.page(message.offset, message.limit);
        let entities = self.repository.groups.find(&GroupCriteria { offset, limit }).await?;
        Ok(ListGroupsResponse {
            groups: entities.into_iter().map(Into::into).collect(),
        })
    }

    #[instrument(skip_all, fields(operation = "create_group", user_id = field::Empty))]
    pub async fn create_group(&self, request: Request<CreateGroupRequest>) -> Result<Response<CreateGroupResponse>, Status> {
        respond("create_group", self.handle_create_group(request).await)
    }

    async fn handle_create_group(&self, request: Request<CreateGroupRequest>) -> ApiResult<CreateGroupResponse> {
        let (metadata, _, message) = request.into_parts();
        if message.name.trim().is_empty() {
            return Err(ApiError::invalid_argument("group name cannot be empty"));
        }
        let actor = self.authorize(&metadata, &message).await?;

        let entity = self
            .repository
            .groups
            .insert(&NewGroup {
                name: message.name,
                description: message.description.filter(|description| !description.is_empty()),
            })
            .await?;

        info!(group_id = entity.id, created_by = actor.user_id(), "Group created");
        Ok(CreateGroupResponse { group: entity.into() })
    }
}
