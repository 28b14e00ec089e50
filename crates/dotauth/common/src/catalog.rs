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

//! Well-known permissions guarding the authority service itself

use crate::permission::{Permission, Permissions};

pub const SUBSYSTEM: &str = "dotauth";

pub const USER_CAN_CREATE: Permission = Permission::from_static("dotauth:user:can create");
pub const USER_CAN_CREATE_STAFF: Permission = Permission::from_static("dotauth:user:can create staff");

pub const USER_CAN_DELETE_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can delete as stranger");
pub const USER_CAN_DELETE_AS_OWNER: Permission = Permission::from_static("dotauth:user:can delete as owner");
pub const USER_CAN_DELETE_STAFF_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can delete staff as stranger");
pub const USER_CAN_DELETE_STAFF_AS_OWNER: Permission = Permission::from_static("dotauth:user:can delete staff as owner");

pub const USER_CAN_MODIFY_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can modify as stranger");
pub const USER_CAN_MODIFY_AS_OWNER: Permission = Permission::from_static("dotauth:user:can modify as owner");
pub const USER_CAN_MODIFY_STAFF_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can modify staff as stranger");
pub const USER_CAN_MODIFY_STAFF_AS_OWNER: Permission = Permission::from_static("dotauth:user:can modify staff as owner");

pub const USER_CAN_RETRIEVE_AS_OWNER: Permission = Permission::from_static("dotauth:user:can retrieve as owner");
pub const USER_CAN_RETRIEVE_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can retrieve as stranger");
pub const USER_CAN_RETRIEVE_STAFF_AS_OWNER: Permission = Permission::from_static("dotauth:user:can retrieve staff as owner");
pub const USER_CAN_RETRIEVE_STAFF_AS_STRANGER: Permission = Permission::from_static("dotauth:user:can retrieve staff as stranger");

pub const USER_PERMISSION_CAN_CREATE: Permission = Permission::from_static("dotauth:user_permission:can create");
pub const USER_PERMISSION_CAN_DELETE: Permission = Permission::from_static("dotauth:user_permission:can delete");
pub const USER_PERMISSION_CAN_MODIFY: Permission = Permission::from_static("dotauth:user_permission:can modify");
pub const USER_PERMISSION_CAN_RETRIEVE: Permission = Permission::from_static("dotauth:user_permission:can retrieve");
pub const USER_PERMISSION_CAN_CHECK_GRANTING_AS_STRANGER: Permission = Permission::from_static("dotauth:user_permission:can check granting as a stranger");

pub const USER_GROUP_CAN_CREATE: Permission = Permission::from_static("dotauth:user_group:can create");
pub const USER_GROUP_CAN_DELETE: Permission = Permission::from_static("dotauth:user_group:can delete");
pub const USER_GROUP_CAN_MODIFY: Permission = Permission::from_static("dotauth:user_group:can modify");
pub const USER_GROUP_CAN_RETRIEVE: Permission = Permission::from_static("dotauth:user_group:can retrieve");
pub const USER_GROUP_CAN_CHECK_BELONGING_AS_STRANGER: Permission = Permission::from_static("dotauth:user_group:can check belonging as a stranger");

pub const PERMISSION_CAN_CREATE: Permission = Permission::from_static("dotauth:permission:can create");
pub const PERMISSION_CAN_DELETE: Permission = Permission::from_static("dotauth:permission:can delete");
pub const PERMISSION_CAN_MODIFY: Permission = Permission::from_static("dotauth:permission:can modify");
pub const PERMISSION_CAN_RETRIEVE: Permission = Permission::from_static("dotauth:permission:can retrieve");

pub const GROUP_CAN_CREATE: Permission = Permission::from_static("dotauth:group:can create");
pub const GROUP_CAN_DELETE: Permission = Permission::from_static("dotauth:group:can delete");
pub const GROUP_CAN_MODIFY: Permission = Permission::from_static("dotauth:group:can modify");
pub const GROUP_CAN_RETRIEVE: Permission = Permission::from_static("dotauth:group:can retrieve");

pub const GROUP_PERMISSION_CAN_CREATE: Permission = Permission::from_static("dotauth:group_permission:can create");
pub const GROUP_PERMISSION_CAN_DELETE: Permission = Permission::from_static("dotauth:group_permission:can delete");
pub const GROUP_PERMISSION_CAN_MODIFY: Permission = Permission::from_static("dotauth:group_permission:can modify");
pub const GROUP_PERMISSION_CAN_RETRIEVE: Permission = Permission::from_static("dotauth:group_permission:can retrieve");

const ALL: [Permission; 36] = [
    USER_CAN_CREATE,
    USER_CAN_CREATE_STAFF,
    USER_CAN_DELETE_AS_STRANGER,
    USER_CAN_DELETE_AS_OWNER,
    USER_CAN_DELETE_STAFF_AS_STRANGER,
    USER_CAN_DELETE_STAFF_AS_OWNER,
    USER_CAN_MODIFY_AS_STRANGER,
    USER_CAN_MODIFY_AS_OWNER,
    USER_CAN_MODIFY_STAFF_AS_STRANGER,
    USER_CAN_MODIFY_STAFF_AS_OWNER,
    USER_CAN_RETRIEVE_AS_OWNER,
    USER_CAN_RETRIEVE_AS_STRANGER,
    USER_CAN_RETRIEVE_STAFF_AS_OWNER,
    USER_CAN_RETRIEVE_STAFF_AS_STRANGER,
    USER_PERMISSION_CAN_CREATE,
    USER_PERMISSION_CAN_DELETE,
    USER_PERMISSION_CAN_MODIFY,
    USER_PERMISSION_CAN_RETRIEVE,
    USER_PERMISSION_CAN_CHECK_GRANTING_AS_STRANGER,
    USER_GROUP_CAN_CREATE,
    USER_GROUP_CAN_DELETE,
    USER_GROUP_CAN_MODIFY,
    USER_GROUP_CAN_RETRIEVE,
    USER_GROUP_CAN_CHECK_BELONGING_AS_STRANGER,
    PERMISSION_CAN_CREATE,
    PERMISSION_CAN_DELETE,
    PERMISSION_CAN_MODIFY,
    PERMISSION_CAN_RETRIEVE,
    GROUP_CAN_CREATE,
    GROUP_CAN_DELETE,
    GROUP_CAN_MODIFY,
    GROUP_CAN_RETRIEVE,
    GROUP_PERMISSION_CAN_CREATE,
    GROUP_PERMISSION_CAN_DELETE,
    GROUP_PERMISSION_CAN_MODIFY,
    GROUP_PERMISSION_CAN_RETRIEVE,
];

/// Every permission the service registers on bootstrap
pub fn all() -> Permissions {
    ALL.iter().cloned().collect()
}
