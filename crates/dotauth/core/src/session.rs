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

//! Session store collaborator
//!
//! The authority service only reads sessions. [`MemorySessionStore`] also
//! issues and abandons them so a single process can run end to end.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dotauth_common::SubjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Transport metadata entry carrying the session token
pub const TOKEN_METADATA_KEY: &str = "token";

/// Opaque session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Decode a token from its transport representation
    pub fn decode(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub subject_id: SubjectId,
    pub bag: HashMap<String, String>,
    pub expire_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at <= now
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("session store unavailable: {message}")]
    Unavailable { message: String },
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &SessionToken) -> Result<Session, SessionError>;
}

/// Process local session store with a fixed time to live
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionToken, Session>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(365)),
        }
    }

    /// Issue a session for `subject_id`
    pub fn start(&self, subject_id: SubjectId, bag: HashMap<String, String>) -> Session {
        let session = Session {
            token: SessionToken::generate(),
            subject_id,
            bag,
            expire_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        info!(subject_id = %session.subject_id, expire_at = %session.expire_at, "Session started");
        session
    }

    /// Remove a session, returning whether it existed
    pub fn abandon(&self, token: &SessionToken) -> bool {
        let removed = self.sessions.remove(token).is_some();
        debug!(removed, "Session abandoned");
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let session = self.sessions.get(token).map(|entry| entry.value().clone()).ok_or(SessionError::NotFound)?;

        if session.is_expired(Utc::now()) {
            self.sessions.remove(token);
            debug!("Expired session evicted");
            return Err(SessionError::NotFound);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_then_get() {
        let store = MemorySessionStore::new(std::time::Duration::from_secs(60));
        let session = store.start(SubjectId::for_user(7), HashMap::new());

        let found = store.get(&session.token).await.unwrap();
        assert_eq!(found, session);
        assert_eq!(found.subject_id.user_id().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let store = MemorySessionStore::new(std::time::Duration::from_secs(60));
        assert_eq!(store.get(&SessionToken::decode("nope")).await.unwrap_err(), SessionError::NotFound);
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let store = MemorySessionStore::new(std::time::Duration::ZERO);
        let session = store.start(SubjectId::for_user(1), HashMap::new());

        assert_eq!(store.get(&session.token).await.unwrap_err(), SessionError::NotFound);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_abandon() {
        let store = MemorySessionStore::new(std::time::Duration::from_secs(60));
        let session = store.start(SubjectId::for_user(1), HashMap::new());

        assert!(store.abandon(&session.token));
        assert!(!store.abandon(&session.token));
        assert!(store.get(&session.token).await.is_err());
    }

    #[test]
    fn test_decode_trims_whitespace() {
        assert_eq!(SessionToken::decode(" abc \n").as_str(), "abc");
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }
}
