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

//! dotauth RPC surface
//!
//! This crate resolves callers from their session token, authorizes each
//! operation against the caller's permissions and serves users, groups,
//! permissions and their relations from the storage layer.

pub mod actor;
pub mod config;
pub mod error;
pub mod firewall;
pub mod handlers;
pub mod models;
pub mod password;

#[cfg(test)]
mod mocks;

pub use actor::{Actor, ActorResolver};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use handlers::{Repositories, RpcServer};
