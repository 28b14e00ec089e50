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

//! Storage layer of the dotauth authority service
//!
//! - [`query`]: composition of `SELECT`, `INSERT` and bulk `DELETE` statements
//! - [`store`]: transactional execution over PostgreSQL
//! - [`sync`]: many-to-many join table synchronization
//! - [`repository`]: users, groups, permissions and their relations
//! - [`session`]: session store collaborator
//! - [`schema`]: table setup and teardown

pub mod error;
pub mod query;
pub mod repository;
pub mod schema;
pub mod session;
pub mod store;
pub mod sync;

pub use error::{ComposeError, ComposeResult, StoreError, StoreResult};
pub use session::{MemorySessionStore, Session, SessionError, SessionStore, SessionToken};
pub use sync::{Relation, SyncOutcome};
