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

//! Error handling for the RPC surface

use dotauth_common::SubjectError;
use dotauth_core::{ComposeError, SessionError, StoreError};
use thiserror::Error;
use tonic::{Code, Status};
use tracing::error;

/// API error types following gRPC status conventions
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Subject(#[from] SubjectError),
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument { message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated { message: message.into() }
    }

    /// Get the gRPC status code for this error
    pub fn code(&self) -> Code {
        match self {
            ApiError::InvalidArgument { .. } => Code::InvalidArgument,
            ApiError::Unauthenticated { .. } => Code::Unauthenticated,
            ApiError::PermissionDenied { .. } => Code::PermissionDenied,
            ApiError::NotFound { .. } => Code::NotFound,
            ApiError::Conflict { .. } => Code::AlreadyExists,
            ApiError::Internal { .. } => Code::Internal,
            ApiError::Store(StoreError::NotFound { .. }) => Code::NotFound,
            ApiError::Store(StoreError::UniqueViolation { .. }) => Code::AlreadyExists,
            ApiError::Store(StoreError::Compose(ComposeError::InvalidIdentifier(_))) => Code::InvalidArgument,
            ApiError::Store(_) => Code::Internal,
            ApiError::Session(SessionError::NotFound) => Code::Unauthenticated,
            ApiError::Session(SessionError::Unavailable { .. }) => Code::Unavailable,
            ApiError::Subject(_) => Code::InvalidArgument,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self.code() {
            Code::InvalidArgument => "invalid_argument",
            Code::Unauthenticated => "unauthenticated",
            Code::PermissionDenied => "permission_denied",
            Code::NotFound => "not_found",
            Code::AlreadyExists => "conflict",
            Code::Unavailable => "unavailable",
            _ => "internal",
        }
    }
}

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        let code = err.code();
        match code {
            Code::Internal | Code::Unavailable => {
                error!(error = %err, error_type = err.error_type(), "Request failed");
                Status::new(code, "internal error")
            }
            _ => Status::new(code, err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_codes() {
        assert_eq!(ApiError::from(StoreError::NotFound { entity: "user" }).code(), Code::NotFound);
        assert_eq!(
            ApiError::from(StoreError::UniqueViolation { constraint: "groups_name_key".to_string() }).code(),
            Code::AlreadyExists
        );
        assert_eq!(ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).code(), Code::Internal);
        assert_eq!(
            ApiError::from(StoreError::from(ComposeError::InvalidIdentifier("x;".to_string()))).code(),
            Code::InvalidArgument
        );
    }

    #[test]
    fn test_internal_errors_are_sanitized() {
        let status = Status::from(ApiError::from(StoreError::Database(sqlx::Error::Protocol("SELECT secret FROM users".to_string()))));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "internal error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let status = Status::from(ApiError::invalid_argument("group id needs to be greater than zero"));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("greater than zero"));
    }

    #[test]
    fn test_session_errors() {
        assert_eq!(ApiError::from(SessionError::NotFound).code(), Code::Unauthenticated);
        assert_eq!(ApiError::from(SessionError::NotFound).error_type(), "unauthenticated");
        assert_eq!(
            ApiError::from(SessionError::Unavailable { message: "down".to_string() }).code(),
            Code::Unavailable
        );
    }
}
