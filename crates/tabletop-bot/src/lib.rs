//! Tabletop Bot
//!
//! The command-handling engine behind the Tabletop community bot.
//!
//! # Architecture
//!
//! - **Events**: the host turns platform callbacks into [`BotEvent`]s
//! - **Dispatcher**: routes each event by kind, parses commands once, and
//!   returns [`Action`]s
//! - **Roster**: `find` reconciles the mentioned users against existing groups
//! - **Throttle**: chatter in monitored channels escalates warnings
//!
//! The engine performs no I/O. Channel and role changes, message delivery and
//! title lookups are carried out by whoever consumes the actions.
//!
//! # Usage
//!
//! ```
//! use tabletop_bot::{Action, BotConfig, BotEvent, Dispatcher, RosterGuild};
//! use tabletop_roster::{RosterEntry, UserId};
//!
//! let guild = RosterGuild::new(vec![
//!     RosterEntry::new(UserId(1), ["@everyone", "catan"]),
//!     RosterEntry::new(UserId(2), ["@everyone", "catan"]),
//! ]);
//! let mut bot = Dispatcher::new(BotConfig::default()).unwrap();
//!
//! let actions = bot
//!     .handle(
//!         BotEvent::Message {
//!             channel: "general".into(),
//!             author: UserId(2),
//!             content: "!find <@1> <@2>".into(),
//!             timestamp: 1000.0,
//!         },
//!         &guild,
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     actions,
//!     vec![Action::Send { channel: "general".into(), text: "catan".into() }]
//! );
//! ```

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod guild;
pub mod render;

pub use command::{Command, MessageIntent, MessageParser, ParseError};
pub use config::BotConfig;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use events::{Action, BotEvent, EventKind};
pub use guild::{Guild, RosterGuild};
