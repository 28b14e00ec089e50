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

//! Rendering of composed entries into Postgres statements
//!
//! Table and column names are interpolated into the SQL text, so every
//! identifier must match `[A-Za-z_][A-Za-z0-9_.]*`. Values never appear in
//! the text; they travel as positional arguments.

use super::composer::{Arg, Composer, Operator};
use crate::error::{ComposeError, ComposeResult};
use serde::{Deserialize, Serialize};

/// Rendered statement and its bind arguments, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub args: Vec<Arg>,
}

/// Sort key for a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: false }
    }
}

/// Behavior of an insert hitting a unique constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnConflict {
    #[default]
    Fail,
    Ignore,
}

fn identifier(name: &str) -> ComposeResult<&str> {
    let mut chars = name.chars();
    let head = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        Ok(name)
    } else {
        Err(ComposeError::InvalidIdentifier(name.to_string()))
    }
}

fn column_list(columns: &[&str]) -> ComposeResult<String> {
    let columns = columns.iter().map(|column| identifier(column)).collect::<ComposeResult<Vec<_>>>()?;
    Ok(columns.join(","))
}

fn where_clause(filter: &Composer) -> ComposeResult<String> {
    if filter.is_empty() {
        return Ok(String::new());
    }

    let predicates = filter
        .entries()
        .iter()
        .map(|entry| identifier(&entry.column).map(|_| entry.predicate()))
        .collect::<ComposeResult<Vec<_>>>()?;
    Ok(format!(" WHERE {}", predicates.join(" AND ")))
}

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] OFFSET $1 LIMIT $2`
///
/// The filter must carry exactly two root arguments: offset then limit.
pub fn select(table: &str, columns: &[&str], filter: Composer, sort: &[Order]) -> ComposeResult<Query> {
    if filter.root_len() != 2 {
        return Err(ComposeError::MissingPagination(filter.root_len()));
    }
    if columns.is_empty() {
        return Err(ComposeError::EmptyColumns { table: table.to_string() });
    }

    let mut sql = format!("SELECT {} FROM {}", column_list(columns)?, identifier(table)?);
    sql.push_str(&where_clause(&filter)?);

    if !sort.is_empty() {
        let keys = sort
            .iter()
            .map(|order| identifier(&order.column).map(|column| format!("{} {}", column, if order.ascending { "ASC" } else { "DESC" })))
            .collect::<ComposeResult<Vec<_>>>()?;
        sql.push_str(&format!(" ORDER BY {}", keys.join(", ")));
    }

    sql.push_str(" OFFSET $1 LIMIT $2");
    Ok(Query { sql, args: filter.into_args() })
}

/// `INSERT INTO <table> (<columns>) VALUES (<placeholders>) [ON CONFLICT DO NOTHING] [RETURNING ...]`
pub fn insert(table: &str, values: Composer, on_conflict: OnConflict, returning: &[&str]) -> ComposeResult<Query> {
    if values.is_empty() {
        return Err(ComposeError::EmptyInsert { table: table.to_string() });
    }

    let columns = values.entries().iter().map(|entry| identifier(&entry.column)).collect::<ComposeResult<Vec<_>>>()?;
    let placeholders: Vec<String> = values.entries().iter().map(|entry| entry.placeholder()).collect();

    let mut sql = format!("INSERT INTO {} ({}) VALUES ({})", identifier(table)?, columns.join(","), placeholders.join(","));
    if on_conflict == OnConflict::Ignore {
        sql.push_str(" ON CONFLICT DO NOTHING");
    }
    if !returning.is_empty() {
        sql.push_str(&format!(" RETURNING {}", column_list(returning)?));
    }

    Ok(Query { sql, args: values.into_args() })
}

/// `DELETE FROM <table> WHERE <column1> = $1 [AND <column2> NOT IN ($2, ...)]`
///
/// An empty `keep` list deletes every row owned by `id`.
pub fn delete_except(table: &str, column1: &str, id: i64, column2: &str, keep: &[i64]) -> ComposeResult<Query> {
    let mut filter = Composer::with_root([Arg::Int(id)]);
    for &other in keep {
        filter.push(column2, Operator::NotIn, other);
    }

    let mut sql = format!("DELETE FROM {} WHERE {} = $1", identifier(table)?, identifier(column1)?);
    if !filter.is_empty() {
        let placeholders: Vec<String> = filter.entries().iter().map(|entry| entry.placeholder()).collect();
        sql.push_str(&format!(" AND {} NOT IN ({})", identifier(column2)?, placeholders.join(", ")));
    }

    Ok(Query { sql, args: filter.into_args() })
}

/// `SELECT EXISTS(SELECT 1 FROM <table> WHERE ...)`
pub fn exists(table: &str, filter: Composer) -> ComposeResult<Query> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {}{})", identifier(table)?, where_clause(&filter)?);
    Ok(Query { sql, args: filter.into_args() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_predicates() {
        let query = select("permissions", &["id", "action"], Composer::paginated(0, 10), &[]).unwrap();
        assert_eq!(query.sql, "SELECT id,action FROM permissions OFFSET $1 LIMIT $2");
        assert_eq!(query.args, vec![Arg::Int(0), Arg::Int(10)]);
    }

    #[test]
    fn test_select_single_predicate() {
        let mut filter = Composer::paginated(0, 1);
        filter.push("id", Operator::Eq, 7i64);

        let query = select("t", &["a", "b"], filter, &[]).unwrap();
        assert_eq!(query.sql, "SELECT a,b FROM t WHERE id = $3 OFFSET $1 LIMIT $2");
        assert_eq!(query.args, vec![Arg::Int(0), Arg::Int(1), Arg::Int(7)]);
    }

    #[test]
    fn test_select_many_predicates_and_sort() {
        let mut filter = Composer::paginated(20, 10);
        filter
            .push("is_staff", Operator::Eq, true)
            .push("username", Operator::ILike, "ad%")
            .push("created_at", Operator::Gte, 5i64);

        let query = select("users", &["id"], filter, &[Order::asc("username"), Order::desc("id")]).unwrap();
        assert_eq!(
            query.sql,
            "SELECT id FROM users WHERE is_staff = $3 AND username ILIKE $4 AND created_at >= $5 ORDER BY username ASC, id DESC OFFSET $1 LIMIT $2"
        );
        assert_eq!(query.args.len(), 5);
    }

    #[test]
    fn test_select_requires_pagination_root() {
        let err = select("t", &["a"], Composer::new(), &[]).unwrap_err();
        assert_eq!(err, ComposeError::MissingPagination(0));
    }

    #[test]
    fn test_identifiers_are_validated() {
        let err = select("t; DROP TABLE users", &["a"], Composer::paginated(0, 1), &[]).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidIdentifier(_)));

        let mut filter = Composer::paginated(0, 1);
        filter.push("1=1 OR id", Operator::Eq, 1i64);
        assert!(select("t", &["a"], filter, &[]).is_err());

        assert!(select("t", &["p.id"], Composer::paginated(0, 1), &[]).is_ok());
    }

    #[test]
    fn test_insert_renders_columns_in_order() {
        let mut values = Composer::new();
        values.set("name", "admins").set("description", "ops");

        let query = insert("groups", values, OnConflict::Fail, &["id", "name"]).unwrap();
        assert_eq!(query.sql, "INSERT INTO groups (name,description) VALUES ($1,$2) RETURNING id,name");
        assert_eq!(query.args, vec![Arg::from("admins"), Arg::from("ops")]);
    }

    #[test]
    fn test_insert_ignoring_conflicts() {
        let mut values = Composer::new();
        values.set("user_id", 1i64).set("group_id", 2i64);

        let query = insert("user_groups", values, OnConflict::Ignore, &[]).unwrap();
        assert_eq!(query.sql, "INSERT INTO user_groups (user_id,group_id) VALUES ($1,$2) ON CONFLICT DO NOTHING");
    }

    #[test]
    fn test_insert_rejects_empty_values() {
        let err = insert("groups", Composer::new(), OnConflict::Fail, &[]).unwrap_err();
        assert_eq!(err, ComposeError::EmptyInsert { table: "groups".to_string() });
    }

    #[test]
    fn test_delete_except_keep_list() {
        let query = delete_except("user_groups", "user_id", 4, "group_id", &[5, 9]).unwrap();
        assert_eq!(query.sql, "DELETE FROM user_groups WHERE user_id = $1 AND group_id NOT IN ($2, $3)");
        assert_eq!(query.args, vec![Arg::Int(4), Arg::Int(5), Arg::Int(9)]);
    }

    #[test]
    fn test_delete_except_empty_keep_list_deletes_all() {
        let query = delete_except("user_groups", "user_id", 4, "group_id", &[]).unwrap();
        assert_eq!(query.sql, "DELETE FROM user_groups WHERE user_id = $1");
        assert_eq!(query.args, vec![Arg::Int(4)]);
    }

    #[test]
    fn test_exists() {
        let mut filter = Composer::new();
        filter.push("user_id", Operator::Eq, 1i64).push("group_id", Operator::Eq, 2i64);

        let query = exists("user_groups", filter).unwrap();
        assert_eq!(query.sql, "SELECT EXISTS(SELECT 1 FROM user_groups WHERE user_id = $1 AND group_id = $2)");
    }
}
