//! Desired-set reconciliation against existing groups.
//!
//! Every group (except [`EVERYONE_GROUP`]) is diffed against the desired set
//! and lands in exactly one bucket. Buckets resolve by strict priority:
//!
//! ```text
//! exact > superset > need_add > none
//! ```
//!
//! Bucket sizes never influence the priority. An exact match wins even when
//! a dozen supersets also exist.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::index::{MembershipIndex, RosterEntry};
use crate::EVERYONE_GROUP;

/// How one group's members relate to the desired set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Same members.
    Exact,
    /// Group lacks some desired users and has no one else.
    NeedAdd,
    /// Group has every desired user plus others.
    Superset,
    /// Group lacks desired users and has others. Never actionable.
    Mismatched,
}

/// `missing = desired − members`, `extra = members − desired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDiff<U: Eq + Hash> {
    pub missing: HashSet<U>,
    pub extra: HashSet<U>,
}

impl<U: Eq + Hash + Clone> GroupDiff<U> {
    pub fn between(desired: &HashSet<U>, members: &HashSet<U>) -> Self {
        Self {
            missing: desired.difference(members).cloned().collect(),
            extra: members.difference(desired).cloned().collect(),
        }
    }

    pub fn kind(&self) -> MatchKind {
        match (self.missing.is_empty(), self.extra.is_empty()) {
            (true, true) => MatchKind::Exact,
            (false, true) => MatchKind::NeedAdd,
            (true, false) => MatchKind::Superset,
            (false, false) => MatchKind::Mismatched,
        }
    }
}

/// A group that neither contains nor is contained by the desired set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch<U: Eq + Hash> {
    pub group: String,
    pub missing: HashSet<U>,
    pub extra: HashSet<U>,
}

/// The single outcome of one reconciliation.
///
/// Plural lists are ordered by group name. Callers should still compare them
/// as sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<U: Eq + Hash> {
    /// A group with exactly the desired members.
    Exact(String),
    /// One group holds everyone desired, plus these extra users.
    Superset(String, HashSet<U>),
    /// Several groups hold everyone desired, each with its extras.
    Supersets(Vec<(String, HashSet<U>)>),
    /// One group would match after adding these users.
    NeedAdd(String, HashSet<U>),
    /// Several groups would match after additions.
    NeedAdds(Vec<(String, HashSet<U>)>),
    /// Nothing actionable. Carries every mismatched group for diagnostics.
    None(Vec<Mismatch<U>>),
}

impl<U: Eq + Hash> Classification<U> {
    /// Stable tag for the presentation layer's template lookup.
    pub fn kind(&self) -> &'static str {
        match self {
            Classification::Exact(_) => "exact",
            Classification::Superset(..) => "superset",
            Classification::Supersets(_) => "supersets",
            Classification::NeedAdd(..) => "need_add",
            Classification::NeedAdds(_) => "need_adds",
            Classification::None(_) => "none",
        }
    }

    /// Names of the groups the outcome points at. Empty for `None`.
    pub fn group_names(&self) -> Vec<&str> {
        match self {
            Classification::Exact(name)
            | Classification::Superset(name, _)
            | Classification::NeedAdd(name, _) => vec![name.as_str()],
            Classification::Supersets(list) | Classification::NeedAdds(list) => {
                list.iter().map(|(name, _)| name.as_str()).collect()
            }
            Classification::None(_) => Vec::new(),
        }
    }
}

/// Classify a desired set against every group in the index.
///
/// Pure and total: any index and any desired set (including empty ones)
/// produce exactly one outcome.
pub fn classify<U>(index: &MembershipIndex<U>, desired: &HashSet<U>) -> Classification<U>
where
    U: Eq + Hash + Clone,
{
    let mut buckets: HashMap<MatchKind, Vec<(String, GroupDiff<U>)>> = HashMap::new();

    for (group, members) in index {
        if group == EVERYONE_GROUP {
            continue;
        }
        let diff = GroupDiff::between(desired, members);
        buckets
            .entry(diff.kind())
            .or_default()
            .push((group.clone(), diff));
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| a.0.cmp(&b.0));
    }

    let outcome = resolve(buckets);
    tracing::debug!(
        outcome = outcome.kind(),
        groups = ?outcome.group_names(),
        "classified desired set"
    );
    outcome
}

fn resolve<U>(mut buckets: HashMap<MatchKind, Vec<(String, GroupDiff<U>)>>) -> Classification<U>
where
    U: Eq + Hash + Clone,
{
    if let Some(mut exact) = take_nonempty(&mut buckets, MatchKind::Exact) {
        // Buckets are sorted, so the first entry is the smallest name
        let (name, _) = exact.swap_remove(0);
        return Classification::Exact(name);
    }

    if let Some(mut superset) = take_nonempty(&mut buckets, MatchKind::Superset) {
        if superset.len() == 1 {
            let (name, diff) = superset.remove(0);
            return Classification::Superset(name, diff.extra);
        }
        return Classification::Supersets(
            superset
                .into_iter()
                .map(|(name, diff)| (name, diff.extra))
                .collect(),
        );
    }

    if let Some(mut need_add) = take_nonempty(&mut buckets, MatchKind::NeedAdd) {
        if need_add.len() == 1 {
            let (name, diff) = need_add.remove(0);
            return Classification::NeedAdd(name, diff.missing);
        }
        return Classification::NeedAdds(
            need_add
                .into_iter()
                .map(|(name, diff)| (name, diff.missing))
                .collect(),
        );
    }

    let mismatched = buckets.remove(&MatchKind::Mismatched).unwrap_or_default();
    Classification::None(
        mismatched
            .into_iter()
            .map(|(group, diff)| Mismatch {
                group,
                missing: diff.missing,
                extra: diff.extra,
            })
            .collect(),
    )
}

fn take_nonempty<T>(buckets: &mut HashMap<MatchKind, Vec<T>>, kind: MatchKind) -> Option<Vec<T>> {
    buckets.remove(&kind).filter(|bucket| !bucket.is_empty())
}

/// Reconciliation entry point: index the roster snapshot, then classify.
///
/// The index is rebuilt on every call.
pub fn reconcile<'a, U, I>(roster: I, desired: &HashSet<U>) -> Classification<U>
where
    U: Eq + Hash + Clone + 'a,
    I: IntoIterator<Item = &'a RosterEntry<U>>,
{
    classify(&MembershipIndex::from_roster(roster), desired)
}
