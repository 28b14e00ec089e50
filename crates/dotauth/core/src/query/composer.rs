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

//! Ordered predicate/value accumulator

use chrono::{DateTime, Utc};
use std::fmt;

/// Bind argument carried alongside rendered SQL
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(value: DateTime<Utc>) -> Self {
        Arg::Timestamp(value)
    }
}

/// Comparison operator of a predicate entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    ILike,
    NotIn,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotIn => "NOT IN",
        };
        f.write_str(op)
    }
}

/// One predicate (or assignment) bound to a positional placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub column: String,
    pub operator: Operator,
    /// 1-based argument position
    pub index: usize,
}

impl Entry {
    pub fn placeholder(&self) -> String {
        format!("${}", self.index)
    }

    /// Render as a `WHERE` predicate
    pub fn predicate(&self) -> String {
        match self.operator {
            Operator::NotIn => format!("{} NOT IN ({})", self.column, self.placeholder()),
            operator => format!("{} {} {}", self.column, operator, self.placeholder()),
        }
    }
}

/// Accumulates entries and their arguments in insertion order.
///
/// The first `root_len()` arguments are reserved and are not tied to any
/// entry (offset and limit for a paginated select). Each entry's placeholder
/// index equals the position of its argument, so `args().len()` is always
/// `root_len() + len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    root: usize,
    entries: Vec<Entry>,
    args: Vec<Arg>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with reserved root arguments occupying the first placeholders
    pub fn with_root<I>(root: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        let args: Vec<Arg> = root.into_iter().collect();
        Self { root: args.len(), entries: Vec::new(), args }
    }

    /// Root arguments `$1` (offset) and `$2` (limit)
    pub fn paginated(offset: i64, limit: i64) -> Self {
        Self::with_root([Arg::Int(offset), Arg::Int(limit)])
    }

    pub fn push(&mut self, column: impl Into<String>, operator: Operator, value: impl Into<Arg>) -> &mut Self {
        self.args.push(value.into());
        self.entries.push(Entry {
            column: column.into(),
            operator,
            index: self.args.len(),
        });
        self
    }

    /// Push only when a value is present
    pub fn push_opt<V: Into<Arg>>(&mut self, column: impl Into<String>, operator: Operator, value: Option<V>) -> &mut Self {
        match value {
            Some(value) => self.push(column, operator, value),
            None => self,
        }
    }

    /// Equality entry, used for insert assignments
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Arg>) -> &mut Self {
        self.push(column, Operator::Eq, value)
    }

    pub fn set_opt<V: Into<Arg>>(&mut self, column: impl Into<String>, value: Option<V>) -> &mut Self {
        self.push_opt(column, Operator::Eq, value)
    }

    pub fn root_len(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn into_args(self) -> Vec<Arg> {
        self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_follow_root() {
        let mut composer = Composer::paginated(0, 10);
        composer.push("id", Operator::Eq, 3i64).push("name", Operator::ILike, "adm%");

        let placeholders: Vec<String> = composer.entries().iter().map(Entry::placeholder).collect();
        assert_eq!(placeholders, vec!["$3", "$4"]);
        assert_eq!(composer.args().len(), composer.root_len() + composer.len());
        assert_eq!(composer.args()[2], Arg::Int(3));
    }

    #[test]
    fn test_push_opt_skips_missing_values() {
        let mut composer = Composer::new();
        composer.push_opt("is_staff", Operator::Eq, None::<bool>).set_opt("is_active", Some(true));

        assert_eq!(composer.len(), 1);
        assert_eq!(composer.entries()[0].predicate(), "is_active = $1");
        assert_eq!(composer.into_args(), vec![Arg::Bool(true)]);
    }

    #[test]
    fn test_not_in_predicate() {
        let mut composer = Composer::with_root([Arg::Int(1)]);
        composer.push("group_id", Operator::NotIn, 5i64);
        assert_eq!(composer.entries()[0].predicate(), "group_id NOT IN ($2)");
    }
}
