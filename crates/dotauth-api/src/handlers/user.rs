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

//! User handlers

use super::{RpcServer, positive, respond};
use crate::actor::Actor;
use crate::error::ApiResult;
use crate::firewall::Guarded;
use crate::models::{GetUserRequest, GetUserResponse, ListUsersRequest, ListUsersResponse};
use dotauth_common::{Permission, catalog};
use dotauth_core::repository::UserCriteria;
use tonic::{Request, Response, Status};
use tracing::{field, instrument};

impl Guarded for GetUserRequest {
    fn denial(&self) -> &'static str {
        "user cannot be retrieved"
    }

    /// Owners may use either permission, strangers need the stranger one
    fn required(&self, actor: &Actor) -> Vec<Permission> {
        if actor.user_id() == self.id {
            vec![catalog::USER_CAN_RETRIEVE_AS_OWNER, catalog::USER_CAN_RETRIEVE_AS_STRANGER]
        } else {
            vec![catalog::USER_CAN_RETRIEVE_AS_STRANGER]
        }
    }
}

impl Guarded for ListUsersRequest {
    fn denial(&self) -> &'static str {
        "list of users cannot be retrieved"
    }

    fn required(&self, _actor: &Actor) -> Vec<Permission> {
        vec![catalog::USER_CAN_RETRIEVE_AS_STRANGER]
    }
}

impl RpcServer {
    #[instrument(skip_all, fields(operation = "get_user", user_id = field::Empty, target_id = request.get_ref().id))]
    pub async fn get_user(&self, request: Request<GetUserRequest>) -> Result<Response<GetUserResponse>, Status> {
        respond("get_user", self.handle_get_user(request).await)
    }

    async fn handle_get_user(&self, request: Request<GetUserRequest>) -> ApiResult<GetUserResponse> {
        let (metadata, _, message) = request.into_parts();
        positive(message.id, "user id")?;
        let actor = self.authorize(&metadata, &message).await?;

        if actor.user_id() == message.id {
            return Ok(GetUserResponse { user: actor.user.into() });
        }

        let entity = self.repository.users.find_one_by_id(message.id).await?;
        Ok(GetUserResponse { user: entity.into() })
    }

    #[instrument(skip_all, fields(operation = "list_users", user_id = field::Empty))]
    pub async fn list_users(&self, request: Request<ListUsersRequest>) -> Result<Response<ListUsersResponse>, Status> {
        respond("list_users", self.handle_list_users(request).await)
    }

    async fn handle_list_users(&self, request: Request<ListUsersRequest>) -> ApiResult<ListUsersResponse> {
        let (metadata, _, message) = request.into_parts();
        self.authorize(&metadata, &message).await?;

        let (offset, limit) = self.page(message.offset, message.limit);
        let criteria = UserCriteria {
            offset,
            limit,
            username: message.username,
            is_superuser: message.is_superuser,
            is_active: message.is_active,
            is_staff: message.is_staff,
            is_confirmed: message.is_confirmed,
            sort: message.sort,
        };

        let entities = self.repository.users.find(&criteria).await?;
        Ok(ListUsersResponse {
            users: entities.into_iter().map(Into::into).collect(),
        })
    }
}
