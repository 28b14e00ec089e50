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

//! Permission identifiers and permission sets
//!
//! A permission is an opaque string made of three colon separated segments:
//! `subsystem:module:action`. The empty permission is the "no permission"
//! sentinel and serializes as an empty string.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

const SEPARATOR: char = ':';

/// Permission identifier (`subsystem:module:action`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// The "no permission" sentinel
    pub const EMPTY: Permission = Permission(Cow::Borrowed(""));

    /// Create a permission from a compile-time string
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Create a permission from any string. Segment content is not validated.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// Assemble a permission from its three segments
    pub fn from_parts(subsystem: &str, module: &str, action: &str) -> Self {
        Self::new(format!("{subsystem}{SEPARATOR}{module}{SEPARATOR}{action}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into `(subsystem, module, action)`.
    ///
    /// One segment yields `("", "", action)`, two segments yield
    /// `("", module, action)`. Segments past the third are ignored.
    pub fn split(&self) -> (&str, &str, &str) {
        if self.is_empty() {
            return ("", "", "");
        }

        let mut parts = self.0.split(SEPARATOR);
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => ("", "", first),
            (Some(second), None) => ("", first, second),
            (Some(second), Some(third)) => (first, second, third),
        }
    }

    pub fn subsystem(&self) -> &str {
        self.split().0
    }

    pub fn module(&self) -> &str {
        self.split().1
    }

    pub fn action(&self) -> &str {
        self.split().2
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Ordered collection of permissions; duplicates are allowed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(Vec<Permission>);

impl Permissions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from plain strings
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(|value| Permission::new(value)).collect()
    }

    /// True if any of `candidates` is held. An empty candidate list never matches.
    pub fn contains(&self, candidates: &[Permission]) -> bool {
        if candidates.is_empty() {
            return false;
        }

        self.0.iter().any(|held| candidates.contains(held))
    }

    pub fn push(&mut self, permission: Permission) {
        self.0.push(permission);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Permission> {
        self.0.iter()
    }

    /// Map the set into plain strings, preserving order
    pub fn strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Permissions {
    type Item = Permission;
    type IntoIter = std::vec::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Permissions {
    type Item = &'a Permission;
    type IntoIter = std::slice::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Permission>> for Permissions {
    fn from(value: Vec<Permission>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_three_segments() {
        let permission = Permission::from("dotauth:user:can create");
        assert_eq!(permission.split(), ("dotauth", "user", "can create"));
        assert_eq!(permission.subsystem(), "dotauth");
        assert_eq!(permission.module(), "user");
        assert_eq!(permission.action(), "can create");
    }

    #[test]
    fn test_split_short_forms() {
        assert_eq!(Permission::from("group:can delete").split(), ("", "group", "can delete"));
        assert_eq!(Permission::from("can delete").split(), ("", "", "can delete"));
        assert_eq!(Permission::EMPTY.split(), ("", "", ""));
    }

    #[test]
    fn test_split_ignores_extra_segments() {
        assert_eq!(Permission::from("a:b:c:d").split(), ("a", "b", "c"));
    }

    #[test]
    fn test_from_parts() {
        let permission = Permission::from_parts("dotauth", "group", "can retrieve");
        assert_eq!(permission, Permission::from_static("dotauth:group:can retrieve"));
    }

    #[test]
    fn test_contains_requires_candidates() {
        let held = Permissions::from_strings(["a:b:c"]);
        assert!(!held.contains(&[]));
        assert!(!Permissions::new().contains(&[]));
        assert!(!Permissions::new().contains(&[Permission::from("a:b:c")]));
    }

    #[test]
    fn test_contains_any_of() {
        let held = Permissions::from_strings(["a:b:x"]);
        assert!(held.contains(&[Permission::from("a:b:x"), Permission::from("a:b:y")]));
        assert!(!held.contains(&[Permission::from("a:b:z")]));
    }

    #[test]
    fn test_empty_permission_serializes_to_empty_string() {
        assert_eq!(serde_json::to_string(&Permission::EMPTY).unwrap(), r#""""#);
        let decoded: Permission = serde_json::from_str(r#""""#).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_text_and_binary_encodings_agree() {
        let config = bincode::config::standard();
        for permission in [Permission::EMPTY, Permission::from("dotauth:user:can create"), Permission::from("single")] {
            let text: Permission = serde_json::from_str(&serde_json::to_string(&permission).unwrap()).unwrap();
            let bytes = bincode::serde::encode_to_vec(&permission, config).unwrap();
            let (binary, _): (Permission, usize) = bincode::serde::decode_from_slice(&bytes, config).unwrap();
            assert_eq!(text, permission);
            assert_eq!(binary, permission);
        }
    }

    #[test]
    fn test_strings_preserve_order() {
        let permissions = Permissions::from_strings(["b", "a", "b"]);
        assert_eq!(permissions.strings(), vec!["b", "a", "b"]);
    }

    fn permission_strategy() -> impl Strategy<Value = Permission> {
        "[a-c]{1,2}(:[a-c]{1,2}){0,2}".prop_map(|value| Permission::new(value))
    }

    proptest! {
        #[test]
        fn prop_contains_ignores_order(
            mut held in prop::collection::vec(permission_strategy(), 0..6),
            mut candidates in prop::collection::vec(permission_strategy(), 0..6),
        ) {
            let expected = Permissions::from(held.clone()).contains(&candidates);
            held.reverse();
            candidates.reverse();
            prop_assert_eq!(Permissions::from(held).contains(&candidates), expected);
        }

        #[test]
        fn prop_contains_matches_intersection(
            held in prop::collection::vec(permission_strategy(), 0..6),
            candidates in prop::collection::vec(permission_strategy(), 0..6),
        ) {
            let intersects = held.iter().any(|p| candidates.contains(p));
            prop_assert_eq!(Permissions::from(held).contains(&candidates), intersects);
        }

        #[test]
        fn prop_split_by_colon_count(segments in prop::collection::vec("[a-z ]{1,6}", 1..=3)) {
            let permission = Permission::new(segments.join(":"));
            let (subsystem, module, action) = permission.split();
            match segments.len() {
                1 => prop_assert_eq!((subsystem, module, action), ("", "", segments[0].as_str())),
                2 => prop_assert_eq!((subsystem, module, action), ("", segments[0].as_str(), segments[1].as_str())),
                _ => prop_assert_eq!((subsystem, module, action), (segments[0].as_str(), segments[1].as_str(), segments[2].as_str())),
            }
        }
    }
}
