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

//! Schema creation and removal

use crate::error::StoreResult;
use sqlx::PgPool;
use tracing::{debug, info};

const SETUP: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        password TEXT NOT NULL,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        is_active BOOLEAN NOT NULL DEFAULT FALSE,
        is_staff BOOLEAN NOT NULL DEFAULT FALSE,
        is_confirmed BOOLEAN NOT NULL DEFAULT FALSE,
        last_login_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS groups (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS permissions (
        id BIGSERIAL PRIMARY KEY,
        subsystem TEXT NOT NULL,
        module TEXT NOT NULL,
        action TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ,
        CONSTRAINT permissions_subsystem_module_action_key UNIQUE (subsystem, module, action)
    )",
    "CREATE TABLE IF NOT EXISTS user_groups (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        group_id BIGINT NOT NULL REFERENCES groups (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT user_groups_pkey PRIMARY KEY (user_id, group_id)
    )",
    "CREATE TABLE IF NOT EXISTS user_permissions (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        permission_id BIGINT NOT NULL REFERENCES permissions (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT user_permissions_pkey PRIMARY KEY (user_id, permission_id)
    )",
    "CREATE TABLE IF NOT EXISTS group_permissions (
        group_id BIGINT NOT NULL REFERENCES groups (id) ON DELETE CASCADE,
        permission_id BIGINT NOT NULL REFERENCES permissions (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT group_permissions_pkey PRIMARY KEY (group_id, permission_id)
    )",
];

const TEARDOWN: &[&str] = &[
    "DROP TABLE IF EXISTS group_permissions",
    "DROP TABLE IF EXISTS user_permissions",
    "DROP TABLE IF EXISTS user_groups",
    "DROP TABLE IF EXISTS permissions",
    "DROP TABLE IF EXISTS groups",
    "DROP TABLE IF EXISTS users",
];

/// Run statements in order, stopping at the first failure
async fn exec_all(pool: &PgPool, statements: &[&str]) -> StoreResult<()> {
    for statement in statements {
        debug!(statement = %statement.lines().next().unwrap_or_default(), "Executing");
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn setup(pool: &PgPool) -> StoreResult<()> {
    exec_all(pool, SETUP).await?;
    info!(tables = SETUP.len(), "Schema created");
    Ok(())
}

pub async fn teardown(pool: &PgPool) -> StoreResult<()> {
    exec_all(pool, TEARDOWN).await?;
    info!(tables = TEARDOWN.len(), "Schema dropped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(statement: &str) -> &str {
        statement.split_whitespace().find(|word| word.ends_with('s') && !word.eq_ignore_ascii_case("EXISTS")).unwrap_or_default()
    }

    #[test]
    fn test_teardown_reverses_setup() {
        let created: Vec<&str> = SETUP.iter().map(|statement| table_of(statement)).collect();
        let mut dropped: Vec<&str> = TEARDOWN.iter().map(|statement| table_of(statement)).collect();
        dropped.reverse();
        assert_eq!(created, dropped);
    }

    #[test]
    fn test_join_tables_are_keyed_by_pair() {
        for (table, pair) in [
            ("user_groups", "(user_id, group_id)"),
            ("user_permissions", "(user_id, permission_id)"),
            ("group_permissions", "(group_id, permission_id)"),
        ] {
            let statement = SETUP.iter().find(|statement| table_of(statement) == table).unwrap();
            assert!(statement.contains(&format!("PRIMARY KEY {pair}")), "{table}");
        }
    }
}
