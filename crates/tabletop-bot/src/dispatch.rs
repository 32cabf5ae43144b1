//! Event dispatch: one handler per event kind, chosen at construction.
//!
//! Events are processed one at a time to completion. The dispatcher owns the
//! per-channel throttles: a monitored channel's throttle appears with its
//! first incident and is dropped when the channel is removed.

use std::collections::{HashMap, HashSet};

use tabletop_roster::{reconcile, MembershipIndex, UserId};
use tabletop_throttle::ThrottleRegistry;

use crate::command::{Command, MessageIntent, MessageParser, USAGE};
use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::events::{Action, BotEvent, EventKind};
use crate::guild::Guild;
use crate::render;

type Handler = fn(&mut Dispatcher, BotEvent, &dyn Guild) -> Result<Vec<Action>>;

/// The bot engine: turns events into actions.
pub struct Dispatcher {
    config: BotConfig,
    parser: MessageParser,
    throttles: ThrottleRegistry<String>,
    me: Option<UserId>,
    handlers: HashMap<EventKind, Handler>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("me", &self.me)
            .field("monitored", &self.config.monitored_channels)
            .field("tracked_channels", &self.throttles.len())
            .finish()
    }
}

impl Dispatcher {
    /// Build the engine. Fails on invalid configuration.
    pub fn new(config: BotConfig) -> Result<Self> {
        config.validate()?;

        let mut handlers: HashMap<EventKind, Handler> = HashMap::new();
        handlers.insert(EventKind::Ready, Self::on_ready);
        handlers.insert(EventKind::Message, Self::on_message);
        handlers.insert(EventKind::ChannelRemoved, Self::on_channel_removed);

        Ok(Self {
            parser: MessageParser::new(config.command_prefix.clone())?,
            throttles: ThrottleRegistry::new(config.throttle)?,
            me: None,
            handlers,
            config,
        })
    }

    /// Handle one event against the current guild snapshot.
    pub fn handle(&mut self, event: BotEvent, guild: &dyn Guild) -> Result<Vec<Action>> {
        let kind = event.kind();
        let handler = self
            .handlers
            .get(&kind)
            .copied()
            .ok_or_else(|| Error::InvalidEvent(format!("no handler for {kind:?}")))?;
        handler(self, event, guild)
    }

    /// The bot's own user, once `ready` has been seen.
    pub fn me(&self) -> Option<UserId> {
        self.me
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn throttles(&self) -> &ThrottleRegistry<String> {
        &self.throttles
    }

    fn on_ready(&mut self, event: BotEvent, _guild: &dyn Guild) -> Result<Vec<Action>> {
        let BotEvent::Ready { user } = event else {
            return Err(Error::InvalidEvent("expected ready".into()));
        };
        tracing::info!(user = %user, "logged in");
        self.me = Some(user);
        Ok(Vec::new())
    }

    fn on_channel_removed(&mut self, event: BotEvent, _guild: &dyn Guild) -> Result<Vec<Action>> {
        let BotEvent::ChannelRemoved { channel } = event else {
            return Err(Error::InvalidEvent("expected channel_removed".into()));
        };
        if self.throttles.deregister(&channel).is_some() {
            tracing::info!(%channel, "stopped monitoring removed channel");
        }
        Ok(Vec::new())
    }

    fn on_message(&mut self, event: BotEvent, guild: &dyn Guild) -> Result<Vec<Action>> {
        let BotEvent::Message {
            channel,
            author,
            content,
            timestamp,
        } = event
        else {
            return Err(Error::InvalidEvent("expected message".into()));
        };

        if Some(author) == self.me {
            return Ok(Vec::new());
        }

        // Monitored channels only exempt well-formed commands
        let monitored = self.config.is_monitored(&channel);
        let actions = match self.parser.classify(&content, self.me) {
            MessageIntent::Command(command) => self.run_command(command, &channel, author, guild),
            MessageIntent::TitleLookup(_) | MessageIntent::Invalid(_) if monitored => {
                self.on_chatter(&channel, author, timestamp)
            }
            MessageIntent::TitleLookup(titles) => titles
                .into_iter()
                .map(|query| Action::LookupTitle {
                    channel: channel.clone(),
                    query,
                })
                .collect(),
            MessageIntent::Invalid(err) => {
                tracing::warn!(%channel, %author, error = %err, "unparseable command");
                reply(&channel, [format!("{err}. {USAGE}")])
            }
            MessageIntent::Chatter => self.on_chatter(&channel, author, timestamp),
        };
        Ok(actions)
    }

    fn on_chatter(&mut self, channel: &str, author: UserId, timestamp: f64) -> Vec<Action> {
        if !self.config.is_monitored(channel) {
            return Vec::new();
        }

        let escalation = self.throttles.record_incident(&channel.to_string(), timestamp);
        tracing::debug!(
            %channel,
            severity = escalation.severity,
            escalated = escalation.escalated,
            "incident in monitored channel"
        );
        if !escalation.escalated {
            return Vec::new();
        }

        let Some(idx) = escalation.message_index(self.config.admonishments.len()) else {
            return Vec::new();
        };
        tracing::info!(%channel, %author, severity = escalation.severity, "admonishing");
        reply(
            channel,
            [render::admonishment(&self.config.admonishments[idx], author)],
        )
    }

    fn run_command(
        &self,
        command: Command,
        channel: &str,
        author: UserId,
        guild: &dyn Guild,
    ) -> Vec<Action> {
        tracing::debug!(command = command.name(), %channel, %author, "command");

        if command.requires_moderator() && !guild.is_member(author, &self.config.bot_admins) {
            tracing::info!(command = command.name(), %author, "moderator command denied");
            return reply(channel, [render::permission_denied(&self.config.bot_admins)]);
        }

        match command {
            Command::Find { users } => {
                let desired: HashSet<UserId> = users.into_iter().collect();
                let outcome = reconcile(guild.roster(), &desired);
                reply(channel, render::render_classification(&outcome))
            }
            Command::Create { name, users } => {
                tracing::info!(group = %name, members = users.len(), "creating group");
                vec![
                    Action::CreateGroup {
                        name: name.clone(),
                        voice_template: self.config.template_voice_channel.clone(),
                        text_template: self.config.template_text_channel.clone(),
                    },
                    Action::AdmitMembers { group: name, users },
                ]
            }
            Command::Invite { name, users } => {
                let index = MembershipIndex::from_roster(guild.roster());
                let Some(existing) = index.members(&name) else {
                    tracing::info!(group = %name, "invite to unknown group");
                    return reply(channel, [render::no_such_group(&name)]);
                };
                let mut members = existing.clone();
                members.extend(users.iter().copied());

                let welcome = render::welcome_message(&name, &members);
                let mut actions = vec![Action::AdmitMembers {
                    group: name.clone(),
                    users,
                }];
                actions.extend(reply(&name, [welcome]));
                actions
            }
            Command::Archive { name } => {
                tracing::info!(group = %name, "archiving group");
                vec![Action::ArchiveGroup {
                    name,
                    category: self.config.archive_category.clone(),
                }]
            }
            Command::Stop => {
                tracing::info!(%author, "stop requested");
                let mut actions = reply(channel, ["Stopping...".to_string()]);
                actions.push(Action::Shutdown);
                actions
            }
            Command::Version => reply(
                channel,
                [format!(
                    "{} {}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION")
                )],
            ),
        }
    }
}

/// `Send` actions for `messages`, each split to the platform's length limit.
fn reply(channel: &str, messages: impl IntoIterator<Item = String>) -> Vec<Action> {
    messages
        .into_iter()
        .flat_map(|text| render::split_message(&text, render::MAX_MESSAGE_CHARS))
        .map(|text| Action::Send {
            channel: channel.to_string(),
            text,
        })
        .collect()
}
