//! Read-only view of the guild the engine consults.

use serde::{Deserialize, Serialize};
use tabletop_roster::{RosterEntry, UserId, EVERYONE_GROUP};

use crate::events::Action;

/// Snapshot queries the engine needs from the platform.
pub trait Guild {
    /// Every member with their group names.
    fn roster(&self) -> &[RosterEntry<UserId>];

    /// Whether `user` is in `group`.
    fn is_member(&self, user: UserId, group: &str) -> bool {
        self.roster()
            .iter()
            .any(|entry| entry.user == user && entry.groups.iter().any(|g| g == group))
    }
}

/// A guild held in memory, updated by replaying the engine's own actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterGuild {
    roster: Vec<RosterEntry<UserId>>,
}

impl RosterGuild {
    pub fn new(roster: Vec<RosterEntry<UserId>>) -> Self {
        Self { roster }
    }

    /// Mirror a membership change the host has carried out.
    ///
    /// Only [`Action::AdmitMembers`] changes the roster; a freshly created
    /// group has no members until someone is admitted.
    pub fn apply(&mut self, action: &Action) {
        if let Action::AdmitMembers { group, users } = action {
            for user in users {
                self.admit(*user, group);
            }
        }
    }

    /// Add `user` to `group`, adding the user to the guild if unknown.
    pub fn admit(&mut self, user: UserId, group: &str) {
        let entry = match self.roster.iter().position(|e| e.user == user) {
            Some(idx) => &mut self.roster[idx],
            None => {
                self.roster
                    .push(RosterEntry::new(user, [EVERYONE_GROUP.to_string()]));
                let last = self.roster.len() - 1;
                &mut self.roster[last]
            }
        };
        if !entry.groups.iter().any(|g| g == group) {
            entry.groups.push(group.to_string());
        }
    }
}

impl Guild for RosterGuild {
    fn roster(&self) -> &[RosterEntry<UserId>] {
        &self.roster
    }
}
