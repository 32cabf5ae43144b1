//! Membership index: group name → set of members.
//!
//! The index mirrors the roster faithfully. It performs no filtering, so the
//! reserved [`EVERYONE_GROUP`](crate::EVERYONE_GROUP) appears here like any
//! other group; excluding it is the classifier's job.

use std::collections::hash_map;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// An opaque chat-platform user identifier.
///
/// Platforms hand out 64-bit snowflakes; nothing in this crate looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub u64);

impl UserId {
    /// Platform mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a roster snapshot: a user and the groups they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry<U> {
    pub user: U,
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<String>,
}

impl<U> RosterEntry<U> {
    pub fn new<I, S>(user: U, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user,
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

/// Mapping from group name to the set of users in that group.
///
/// Built fresh for every reconciliation; the roster may change between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipIndex<U: Eq + Hash> {
    groups: HashMap<String, HashSet<U>>,
}

impl<U: Eq + Hash> Default for MembershipIndex<U> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<U: Eq + Hash + Clone> MembershipIndex<U> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a roster snapshot.
    ///
    /// Duplicate memberships collapse; an empty roster yields an empty index.
    pub fn from_roster<'a, I>(roster: I) -> Self
    where
        I: IntoIterator<Item = &'a RosterEntry<U>>,
        U: 'a,
    {
        let mut index = Self::new();
        for entry in roster {
            for group in &entry.groups {
                index.insert(group.clone(), entry.user.clone());
            }
        }
        index
    }

    /// Record `user` as a member of `group`. Returns false if already present.
    pub fn insert(&mut self, group: impl Into<String>, user: U) -> bool {
        self.groups.entry(group.into()).or_default().insert(user)
    }

    /// Members of a group, if the group exists.
    pub fn members(&self, group: &str) -> Option<&HashSet<U>> {
        self.groups.get(group)
    }

    /// Whether `user` belongs to `group`.
    pub fn contains(&self, group: &str, user: &U) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(user))
    }

    /// Group names in the index, in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, HashSet<U>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<U: Eq + Hash + Clone> FromIterator<RosterEntry<U>> for MembershipIndex<U> {
    fn from_iter<I: IntoIterator<Item = RosterEntry<U>>>(iter: I) -> Self {
        let mut index = Self::new();
        for entry in iter {
            for group in entry.groups {
                index.insert(group, entry.user.clone());
            }
        }
        index
    }
}

impl<'a, U: Eq + Hash> IntoIterator for &'a MembershipIndex<U> {
    type Item = (&'a String, &'a HashSet<U>);
    type IntoIter = hash_map::Iter<'a, String, HashSet<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
