//! User-facing text for reconciliation outcomes and replies.

use std::collections::HashSet;

use tabletop_roster::{Classification, UserId};

/// Longest single message the bot posts. Longer text is split.
pub const MAX_MESSAGE_CHARS: usize = 1800;

/// Space-separated mentions, ordered by user id.
pub fn mention_list<'a>(users: impl IntoIterator<Item = &'a UserId>) -> String {
    let mut users: Vec<&UserId> = users.into_iter().collect();
    users.sort();
    users
        .iter()
        .map(|u| u.mention())
        .collect::<Vec<_>>()
        .join(" ")
}

fn superset_line(group: &str, extra: &HashSet<UserId>) -> String {
    format!("'{group}' matches, but also includes {}", mention_list(extra))
}

fn need_add_line(group: &str, missing: &HashSet<UserId>) -> String {
    format!("'{group}' nearly matches, but is missing {}", mention_list(missing))
}

/// Messages answering a `find`, one per post.
pub fn render_classification(outcome: &Classification<UserId>) -> Vec<String> {
    match outcome {
        Classification::Exact(group) => vec![group.clone()],
        Classification::Superset(group, extra) => vec![superset_line(group, extra)],
        Classification::Supersets(groups) => {
            let mut lines = vec!["The following groups match:".to_string()];
            lines.extend(groups.iter().map(|(g, extra)| superset_line(g, extra)));
            lines
        }
        Classification::NeedAdd(group, missing) => vec![need_add_line(group, missing)],
        Classification::NeedAdds(groups) => {
            let mut lines = vec!["The following groups nearly match:".to_string()];
            lines.extend(groups.iter().map(|(g, missing)| need_add_line(g, missing)));
            lines
        }
        Classification::None(_) => {
            vec!["No matching group found, create a new one.".to_string()]
        }
    }
}

/// Greeting posted in a group's text channel after an invite.
pub fn welcome_message<'a>(group: &str, members: impl IntoIterator<Item = &'a UserId>) -> String {
    format!(
        ":wave: Welcome {}!  Please join the '{group}' voice channel \
         for voice chat and use this channel for text chat.",
        mention_list(members)
    )
}

pub fn permission_denied(admin_group: &str) -> String {
    format!("You don't have permission to do this, please ask a @{admin_group}")
}

pub fn no_such_group(group: &str) -> String {
    format!("There is no group called '{group}'")
}

/// Fill an admonishment template for `user`.
pub fn admonishment(template: &str, user: UserId) -> String {
    template.replace("{user}", &user.mention())
}

/// Split `text` into chunks of at most `limit` characters.
///
/// Splits on character boundaries, never inside a UTF-8 sequence. Empty text
/// yields no chunks.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
