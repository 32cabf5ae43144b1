//! End-to-end tests: events in, actions out, against an in-memory guild.

use tabletop_bot::{Action, BotConfig, BotEvent, Dispatcher, RosterGuild};
use tabletop_roster::{RosterEntry, UserId, EVERYONE_GROUP};
use tabletop_throttle::ThrottleConfig;

const ME: UserId = UserId(999);
const MOD: UserId = UserId(1);

fn config() -> BotConfig {
    BotConfig {
        bot_admins: "mods".into(),
        monitored_channels: vec!["announcements".into()],
        admonishments: vec![
            "{user}, first warning".into(),
            "{user}, second warning".into(),
        ],
        throttle: ThrottleConfig::new(20.0, 5.0),
        ..BotConfig::default()
    }
}

fn guild() -> RosterGuild {
    RosterGuild::new(vec![
        RosterEntry::new(MOD, [EVERYONE_GROUP, "mods"]),
        RosterEntry::new(UserId(2), [EVERYONE_GROUP, "catan", "azul"]),
        RosterEntry::new(UserId(3), [EVERYONE_GROUP, "catan", "azul"]),
        RosterEntry::new(UserId(4), [EVERYONE_GROUP, "catan"]),
        RosterEntry::new(UserId(5), [EVERYONE_GROUP]),
    ])
}

fn ready_bot() -> Dispatcher {
    let mut bot = Dispatcher::new(config()).unwrap();
    bot.handle(BotEvent::Ready { user: ME }, &guild()).unwrap();
    bot
}

fn say(channel: &str, author: UserId, content: &str, timestamp: f64) -> BotEvent {
    BotEvent::Message {
        channel: channel.into(),
        author,
        content: content.into(),
        timestamp,
    }
}

fn texts(actions: &[Action]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Send { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn find_reports_exact_group() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", UserId(5), "!find <@2> <@3>", 10.0), &guild())
        .unwrap();
    // azul is exact, catan is a superset; exact wins
    assert_eq!(texts(&actions), vec!["azul"]);
}

#[test]
fn find_reports_superset() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", UserId(5), "!find <@2> <@4>", 10.0), &guild())
        .unwrap();
    assert_eq!(
        texts(&actions),
        vec!["'catan' matches, but also includes <@3>"]
    );
}

#[test]
fn find_reports_several_near_matches() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(
            say("general", UserId(5), "!find <@1> <@2> <@3> <@4>", 10.0),
            &guild(),
        )
        .unwrap();
    assert_eq!(
        texts(&actions),
        vec![
            "The following groups nearly match:",
            "'azul' nearly matches, but is missing <@1> <@4>",
            "'catan' nearly matches, but is missing <@1>",
            "'mods' nearly matches, but is missing <@2> <@3> <@4>",
        ]
    );
}

#[test]
fn find_with_no_match() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", UserId(5), "!find <@4> <@5>", 10.0), &guild())
        .unwrap();
    assert_eq!(
        texts(&actions),
        vec!["No matching group found, create a new one."]
    );
}

#[test]
fn mention_prefix_runs_commands() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(
            say("general", UserId(5), "<@999> find <@4> <@2> <@3>", 10.0),
            &guild(),
        )
        .unwrap();
    assert_eq!(texts(&actions), vec!["catan"]);
}

#[test]
fn create_then_find_sees_new_group() {
    let mut bot = ready_bot();
    let mut guild = guild();

    let actions = bot
        .handle(say("general", MOD, "!create wingspan <@4> <@5>", 10.0), &guild)
        .unwrap();
    assert_eq!(
        actions,
        vec![
            Action::CreateGroup {
                name: "wingspan".into(),
                voice_template: "voice-template".into(),
                text_template: "text-template".into(),
            },
            Action::AdmitMembers {
                group: "wingspan".into(),
                users: vec![UserId(4), UserId(5)],
            },
        ]
    );
    for action in &actions {
        guild.apply(action);
    }

    let actions = bot
        .handle(say("general", UserId(5), "!find <@5> <@4>", 11.0), &guild)
        .unwrap();
    assert_eq!(texts(&actions), vec!["wingspan"]);
}

#[test]
fn invite_admits_and_welcomes() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", MOD, "!invite azul <@5>", 10.0), &guild())
        .unwrap();
    assert_eq!(
        actions,
        vec![
            Action::AdmitMembers {
                group: "azul".into(),
                users: vec![UserId(5)],
            },
            Action::Send {
                channel: "azul".into(),
                text: ":wave: Welcome <@2> <@3> <@5>!  Please join the 'azul' voice channel \
                       for voice chat and use this channel for text chat."
                    .into(),
            },
        ]
    );
}

#[test]
fn invite_to_unknown_group_is_refused() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", MOD, "!invite wingspan <@5>", 10.0), &guild())
        .unwrap();
    assert_eq!(
        actions,
        vec![Action::Send {
            channel: "general".into(),
            text: "There is no group called 'wingspan'".into(),
        }]
    );
}

#[test]
fn archive_and_stop_are_moderator_only() {
    let mut bot = ready_bot();

    let denied = bot
        .handle(say("general", UserId(2), "!archive catan", 10.0), &guild())
        .unwrap();
    assert_eq!(
        texts(&denied),
        vec!["You don't have permission to do this, please ask a @mods"]
    );
    assert!(!denied.iter().any(|a| matches!(a, Action::ArchiveGroup { .. })));

    let archived = bot
        .handle(say("general", MOD, "!archive catan", 11.0), &guild())
        .unwrap();
    assert_eq!(
        archived,
        vec![Action::ArchiveGroup {
            name: "catan".into(),
            category: "archive".into(),
        }]
    );

    let stopped = bot.handle(say("general", MOD, "!stop", 12.0), &guild()).unwrap();
    assert_eq!(stopped.last(), Some(&Action::Shutdown));
    assert_eq!(texts(&stopped), vec!["Stopping..."]);
}

#[test]
fn version_is_open_to_everyone() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", UserId(5), "!version", 10.0), &guild())
        .unwrap();
    let texts = texts(&actions);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("tabletop-bot "));
}

#[test]
fn bracketed_titles_request_lookups() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(
            say("general", UserId(5), "anyone for [Root] or [Spirit Island]?", 10.0),
            &guild(),
        )
        .unwrap();
    assert_eq!(
        actions,
        vec![
            Action::LookupTitle {
                channel: "general".into(),
                query: "Root".into(),
            },
            Action::LookupTitle {
                channel: "general".into(),
                query: "Spirit Island".into(),
            },
        ]
    );
}

#[test]
fn chatter_outside_monitored_channels_is_ignored() {
    let mut bot = ready_bot();
    let actions = bot
        .handle(say("general", UserId(5), "hello!", 1001.0), &guild())
        .unwrap();
    assert!(actions.is_empty());
    assert!(bot.throttles().is_empty());
}

#[test]
fn monitored_channel_escalates_and_decays() {
    let mut bot = ready_bot();
    let g = guild();

    // First incident always warns, at severity 0
    let a = bot.handle(say("announcements", UserId(5), "hi", 1001.0), &g).unwrap();
    assert_eq!(texts(&a), vec!["<@5>, first warning"]);

    // Inside the escalation interval: no warning
    let a = bot.handle(say("announcements", UserId(5), "hi again", 1003.0), &g).unwrap();
    assert!(a.is_empty());

    // Still fast, interval passed: second warning
    let a = bot.handle(say("announcements", UserId(4), "me too", 1010.0), &g).unwrap();
    assert_eq!(texts(&a), vec!["<@4>, second warning"]);

    // Severity 2 is past the end of the list: clamp to the last message
    let a = bot.handle(say("announcements", UserId(4), "and me", 1016.0), &g).unwrap();
    assert_eq!(texts(&a), vec!["<@4>, second warning"]);

    // Long silence: decays, and slow incidents never escalate
    let a = bot.handle(say("announcements", UserId(5), "later", 2000.0), &g).unwrap();
    assert!(a.is_empty());
    let severity = bot
        .throttles()
        .get(&"announcements".to_string())
        .map(|t| t.severity());
    assert_eq!(severity, Some(0));
}

#[test]
fn commands_in_monitored_channel_are_not_incidents() {
    let mut bot = ready_bot();
    let a = bot
        .handle(say("announcements", UserId(5), "!version", 1001.0), &guild())
        .unwrap();
    assert_eq!(texts(&a).len(), 1);
    assert!(bot.throttles().is_empty());
}

#[test]
fn malformed_commands_and_lookups_in_monitored_channel_are_incidents() {
    let mut bot = ready_bot();
    let g = guild();

    let a = bot.handle(say("announcements", UserId(5), "!!! wow", 1001.0), &g).unwrap();
    assert_eq!(texts(&a), vec!["<@5>, first warning"]);
    assert_eq!(bot.throttles().len(), 1);

    // Debounced: neither a usage reply nor a lookup
    let a = bot.handle(say("announcements", UserId(5), "!lol", 1002.0), &g).unwrap();
    assert!(a.is_empty());
    let a = bot
        .handle(say("announcements", UserId(5), "[Azul] anyone?", 1003.0), &g)
        .unwrap();
    assert!(a.is_empty());

    let severity = bot
        .throttles()
        .get(&"announcements".to_string())
        .map(|t| t.severity());
    assert_eq!(severity, Some(1));
}

#[test]
fn malformed_commands_elsewhere_get_usage() {
    let mut bot = ready_bot();
    let a = bot.handle(say("general", UserId(5), "!lol", 10.0), &guild()).unwrap();
    let texts = texts(&a);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Commands:"));
    assert!(bot.throttles().is_empty());
}

#[test]
fn removing_channel_resets_its_throttle() {
    let mut bot = ready_bot();
    let g = guild();

    bot.handle(say("announcements", UserId(5), "hi", 1001.0), &g).unwrap();
    bot.handle(say("announcements", UserId(5), "hi", 1010.0), &g).unwrap();
    assert_eq!(bot.throttles().len(), 1);

    bot.handle(
        BotEvent::ChannelRemoved {
            channel: "announcements".into(),
        },
        &g,
    )
    .unwrap();
    assert!(bot.throttles().is_empty());

    // A recreated channel starts over at the first warning
    let a = bot.handle(say("announcements", UserId(5), "hi", 1020.0), &g).unwrap();
    assert_eq!(texts(&a), vec!["<@5>, first warning"]);
}

#[test]
fn own_messages_never_count() {
    let mut bot = ready_bot();
    let a = bot
        .handle(say("announcements", ME, "<@5>, first warning", 1001.0), &guild())
        .unwrap();
    assert!(a.is_empty());
    assert!(bot.throttles().is_empty());
}

#[test]
fn events_replay_from_json_lines() {
    let mut bot = Dispatcher::new(config()).unwrap();
    let g = guild();
    let lines = [
        r#"{"type":"ready","user":999}"#,
        r#"{"type":"message","channel":"general","author":5,"content":"!find <@2> <@3>","timestamp":10}"#,
    ];

    let mut out = Vec::new();
    for line in lines {
        let event: BotEvent = serde_json::from_str(line).unwrap();
        out.extend(bot.handle(event, &g).unwrap());
    }
    assert_eq!(
        serde_json::to_string(&out).unwrap(),
        r#"[{"action":"send","channel":"general","text":"azul"}]"#
    );
}

#[test]
fn invalid_config_is_rejected() {
    let bad = BotConfig {
        throttle: ThrottleConfig::new(0.0, 5.0),
        ..config()
    };
    assert!(Dispatcher::new(bad).is_err());
}
