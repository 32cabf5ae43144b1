//! Message classification and command parsing.
//!
//! A message is inspected once, here, and turned into a [`MessageIntent`].
//! Nothing downstream looks at raw content again.

use regex::Regex;
use tabletop_roster::UserId;
use thiserror::Error;

use crate::error::Result;

/// Longest title accepted inside `[...]`.
pub const MAX_LOOKUP_CHARS: usize = 50;

/// What an inbound message asks of the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageIntent {
    /// A well-formed command
    Command(Command),
    /// Something addressed to the bot that did not parse
    Invalid(ParseError),
    /// Bracketed board game titles to look up
    TitleLookup(Vec<String>),
    /// Ordinary conversation
    Chatter,
}

/// Bot commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Which existing group matches these users?
    Find { users: Vec<UserId> },
    /// Create a group with channels and role, then admit users
    Create { name: String, users: Vec<UserId> },
    /// Admit users to an existing group and welcome them
    Invite { name: String, users: Vec<UserId> },
    /// Retire a group's channels
    Archive { name: String },
    /// Shut the bot down
    Stop,
    /// Report the running version
    Version,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Find { .. } => "find",
            Command::Create { .. } => "create",
            Command::Invite { .. } => "invite",
            Command::Archive { .. } => "archive",
            Command::Stop => "stop",
            Command::Version => "version",
        }
    }

    /// Whether only members of the admin group may run this.
    pub fn requires_moderator(&self) -> bool {
        matches!(
            self,
            Command::Create { .. } | Command::Invite { .. } | Command::Archive { .. } | Command::Stop
        )
    }
}

/// Why a command failed to parse. Rendered back to the author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a user mention")]
    InvalidUser(String),
}

/// One-line usage summary.
pub const USAGE: &str = "Commands: find @users | create <name> @users | invite <name> @users | \
                         archive <name> | stop | version";

/// Classifies raw message content.
#[derive(Debug, Clone)]
pub struct MessageParser {
    prefix: String,
    lookup: Regex,
    mention: Regex,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            prefix: prefix.into(),
            lookup: Regex::new(&format!(r"\[(.{{0,{MAX_LOOKUP_CHARS}}}?)\]"))?,
            mention: Regex::new(r"^<@!?(\d+)>$")?,
        })
    }

    /// Decide what `content` asks for.
    ///
    /// `me` is the bot's own user, when known; a leading mention of it works
    /// like the command prefix.
    pub fn classify(&self, content: &str, me: Option<UserId>) -> MessageIntent {
        let titles = self.lookup_titles(content);
        if !titles.is_empty() {
            return MessageIntent::TitleLookup(titles);
        }

        match self.strip_prefix(content, me) {
            Some(rest) if !rest.trim().is_empty() => match self.parse_command(rest) {
                Ok(command) => MessageIntent::Command(command),
                Err(err) => MessageIntent::Invalid(err),
            },
            _ => MessageIntent::Chatter,
        }
    }

    /// Titles written as `[name]`, in order of appearance. Blank ones are skipped.
    pub fn lookup_titles(&self, content: &str) -> Vec<String> {
        if !content.contains('[') {
            return Vec::new();
        }
        self.lookup
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn strip_prefix<'a>(&self, content: &'a str, me: Option<UserId>) -> Option<&'a str> {
        if let Some(rest) = content.strip_prefix(self.prefix.as_str()) {
            return Some(rest);
        }
        let me = me?;
        [format!("<@{}>", me.0), format!("<@!{}>", me.0)]
            .iter()
            .find_map(|mention| content.strip_prefix(mention.as_str()))
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    }

    /// Parse `name arg...` (the text after the prefix).
    pub fn parse_command(&self, text: &str) -> std::result::Result<Command, ParseError> {
        let mut tokens = text.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        match name {
            "find" => Ok(Command::Find {
                users: self.parse_users(&args)?,
            }),
            "create" => {
                let (group, rest) = split_name(&args, "create")?;
                Ok(Command::Create {
                    name: group,
                    users: self.parse_users(rest)?,
                })
            }
            "invite" => {
                let (group, rest) = split_name(&args, "invite")?;
                Ok(Command::Invite {
                    name: group,
                    users: self.parse_users(rest)?,
                })
            }
            "archive" => {
                let (group, _) = split_name(&args, "archive")?;
                Ok(Command::Archive { name: group })
            }
            "stop" => Ok(Command::Stop),
            "version" => Ok(Command::Version),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }

    fn parse_users(&self, tokens: &[&str]) -> std::result::Result<Vec<UserId>, ParseError> {
        tokens
            .iter()
            .map(|token| {
                self.mention
                    .captures(token)
                    .and_then(|caps| caps.get(1))
                    .and_then(|id| id.as_str().parse().ok())
                    .map(UserId)
                    .ok_or_else(|| ParseError::InvalidUser(token.to_string()))
            })
            .collect()
    }
}

fn split_name<'a, 'b>(
    args: &'b [&'a str],
    command: &'static str,
) -> std::result::Result<(String, &'b [&'a str]), ParseError> {
    match args.split_first() {
        Some((name, rest)) => Ok((name.to_string(), rest)),
        None => Err(ParseError::MissingArgument {
            command,
            argument: "group name",
        }),
    }
}
