//! Tabletop Roster
//!
//! Answers "is there already a group for these people?" against a snapshot of
//! the guild's groups.
//!
//! # Pipeline
//!
//! 1. [`MembershipIndex`] mirrors the roster: group name → member set
//! 2. [`classify`] diffs every group against the desired set
//! 3. One [`Classification`] comes back, chosen by strict priority
//!
//! ```text
//! missing = desired − members      extra = members − desired
//!
//!   missing  extra   bucket
//!   ∅        ∅       exact
//!   ≠∅       ∅       need_add
//!   ∅        ≠∅      superset
//!   ≠∅       ≠∅      mismatched
//! ```
//!
//! Everything here is pure. Calls share no state and are safe from any thread.

mod classify;
mod index;

pub use classify::{classify, reconcile, Classification, GroupDiff, MatchKind, Mismatch};
pub use index::{MembershipIndex, RosterEntry, UserId};

/// Reserved pseudo-group every user belongs to. Excluded from classification.
pub const EVERYONE_GROUP: &str = "@everyone";
