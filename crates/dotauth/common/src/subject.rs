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

//! Session subject identifiers
//!
//! Sessions are owned by an external store that only knows an opaque subject
//! string. Users are encoded as `dotauth:user:<id>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const USER_PREFIX: &str = "dotauth:user:";

/// Errors raised while decoding a subject identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    #[error("subject identifier '{0}' does not identify a user")]
    NotAUser(String),

    #[error("subject identifier '{0}' carries a malformed user id")]
    MalformedUserId(String),
}

/// Subject of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Subject identifying the given user
    pub fn for_user(user_id: i64) -> Self {
        Self(format!("{USER_PREFIX}{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the user id. Only positive ids are valid.
    pub fn user_id(&self) -> Result<i64, SubjectError> {
        let raw = self.0.strip_prefix(USER_PREFIX).ok_or_else(|| SubjectError::NotAUser(self.0.clone()))?;

        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(SubjectError::MalformedUserId(self.0.clone())),
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_subject_round_trip() {
        let subject = SubjectId::for_user(42);
        assert_eq!(subject.as_str(), "dotauth:user:42");
        assert_eq!(subject.user_id(), Ok(42));
    }

    #[test]
    fn test_foreign_subject_is_rejected() {
        let subject = SubjectId::new("service:worker:7");
        assert!(matches!(subject.user_id(), Err(SubjectError::NotAUser(_))));
    }

    #[test]
    fn test_malformed_user_id_is_rejected() {
        for raw in ["dotauth:user:", "dotauth:user:abc", "dotauth:user:0", "dotauth:user:-3"] {
            assert!(matches!(SubjectId::new(raw).user_id(), Err(SubjectError::MalformedUserId(_))), "{raw}");
        }
    }
}
