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

//! Per-operation authorization

use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use dotauth_common::Permission;
use tracing::warn;

/// Authorization rule of one RPC operation
pub trait Guarded {
    /// What is denied, e.g. "list of groups cannot be retrieved"
    fn denial(&self) -> &'static str;

    /// Permissions of which the actor must hold at least one
    fn required(&self, actor: &Actor) -> Vec<Permission>;
}

/// Allow superusers unconditionally, everyone else on any-of the required permissions
pub fn check<R: Guarded + ?Sized>(request: &R, actor: &Actor) -> ApiResult<()> {
    if actor.is_superuser() {
        return Ok(());
    }

    if actor.permissions.contains(&request.required(actor)) {
        return Ok(());
    }

    warn!(user_id = actor.user_id(), denial = request.denial(), "Request denied");
    Err(ApiError::PermissionDenied {
        message: format!("dotauth: {}, missing permission", request.denial()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::actor;
    use dotauth_common::Permissions;
    use tonic::Code;

    struct Rule(&'static [&'static str]);

    impl Guarded for Rule {
        fn denial(&self) -> &'static str {
            "thing cannot be done"
        }

        fn required(&self, _actor: &Actor) -> Vec<Permission> {
            self.0.iter().map(|value| Permission::from(*value)).collect()
        }
    }

    #[test]
    fn test_superuser_passes_everything() {
        let root = actor(1, true, Permissions::new());
        assert!(check(&Rule(&["a:b:z"]), &root).is_ok());
        assert!(check(&Rule(&[]), &root).is_ok());
    }

    #[test]
    fn test_any_of_required_permissions() {
        let user = actor(2, false, Permissions::from_strings(["a:b:x"]));
        assert!(check(&Rule(&["a:b:x", "a:b:y"]), &user).is_ok());

        let err = check(&Rule(&["a:b:z"]), &user).unwrap_err();
        assert_eq!(err.code(), Code::PermissionDenied);
    }

    #[test]
    fn test_no_requirements_denies_regular_users() {
        let user = actor(2, false, Permissions::from_strings(["a:b:x"]));
        assert!(check(&Rule(&[]), &user).is_err());
    }

    #[test]
    fn test_denial_does_not_leak_permissions() {
        let user = actor(2, false, Permissions::from_strings(["secret:held:permission"]));
        let message = check(&Rule(&["a:b:z"]), &user).unwrap_err().to_string();
        assert!(message.contains("thing cannot be done"));
        assert!(!message.contains("secret"));
        assert!(!message.contains("a:b:z"));
    }
}
