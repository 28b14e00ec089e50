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

//! Error types for query composition and storage

use thiserror::Error;

/// Caller contract violations detected while rendering SQL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("insert into '{table}' has no values")]
    EmptyInsert { table: String },

    #[error("select from '{table}' has no output columns")]
    EmptyColumns { table: String },

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("select expects offset and limit as the two root arguments, got {0} root arguments")]
    MissingPagination(usize),
}

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("query composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound { entity: "row" },
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation {
                constraint: db.constraint().unwrap_or_default().to_string(),
            },
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
