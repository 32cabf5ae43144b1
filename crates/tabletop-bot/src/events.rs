//! Inbound platform events and outbound actions.
//!
//! The engine never talks to the platform. The host turns platform callbacks
//! into [`BotEvent`]s and carries out the [`Action`]s that come back.

use serde::{Deserialize, Serialize};
use tabletop_roster::UserId;

/// Events delivered by the host, one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotEvent {
    /// The bot logged in as `user`
    Ready { user: UserId },

    /// A message was posted
    Message {
        channel: String,
        author: UserId,
        content: String,
        /// Seconds since the Unix epoch
        timestamp: f64,
    },

    /// A channel was deleted; its moderation state goes with it
    ChannelRemoved { channel: String },
}

/// Discriminant of [`BotEvent`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Message,
    ChannelRemoved,
}

impl BotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::Ready { .. } => EventKind::Ready,
            BotEvent::Message { .. } => EventKind::Message,
            BotEvent::ChannelRemoved { .. } => EventKind::ChannelRemoved,
        }
    }
}

/// Side effects for the host to perform, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Post `text` in `channel`
    Send { channel: String, text: String },

    /// Clone the voice and text templates into a group named `name`, with a
    /// mentionable role of the same name
    CreateGroup {
        name: String,
        voice_template: String,
        text_template: String,
    },

    /// Give `users` the role of group `group`
    AdmitMembers { group: String, users: Vec<UserId> },

    /// Revoke the group's access to its text channel, move it under
    /// `category` and delete its voice channel
    ArchiveGroup { name: String, category: String },

    /// Look up a board game title and post the result in `channel`
    LookupTitle { channel: String, query: String },

    /// Disconnect and exit
    Shutdown,
}
