//! Plain-text rendering of client view models.

use std::fmt::Write;

use slackr_client::channels::list::NO_CHANNELS;
use slackr_client::channels::{ChannelAction, ChannelDetailsView, ChannelEntry};
use slackr_client::messages::images::Lightbox;
use slackr_client::messages::renderer::{Avatar, EMPTY_FEED, MessageAction};
use slackr_client::messages::{FeedView, MessageView};
use slackr_client::users::ProfileView;
use slackr_types::events::Notification;
use slackr_types::models::UserSummary;

use crate::commands::USAGE;

pub fn channel_list(entries: &[ChannelEntry]) -> String {
    if entries.is_empty() {
        return NO_CHANNELS.to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let marker = if entry.active { '>' } else { ' ' };
        let lock = if entry.private { " [private]" } else { "" };
        let joined = if entry.member { "" } else { " (not joined)" };
        let _ = writeln!(out, "{} {:>4}  #{}{}{}", marker, entry.id, entry.name, lock, joined);
    }
    out
}

pub fn details(view: &ChannelDetailsView) -> String {
    let actions: Vec<&str> = view
        .actions
        .iter()
        .map(|action| match action {
            ChannelAction::Join => "join",
            ChannelAction::Leave => "leave",
            ChannelAction::Edit => "edit-channel",
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "#{} ({})", view.name, view.visibility);
    let _ = writeln!(out, "  {}", view.description);
    let _ = writeln!(
        out,
        "  Created {} by {}, {} member(s)",
        view.created, view.creator_name, view.member_count
    );
    if !actions.is_empty() {
        let _ = writeln!(out, "  Actions: {}", actions.join(", "));
    }
    out
}

pub fn message(view: &MessageView) -> String {
    let avatar = match &view.avatar {
        Avatar::Image(_) => "@".to_string(),
        Avatar::Initial(initial) => initial.to_string(),
    };
    let mut flags = String::new();
    if view.pinned {
        flags.push_str(" [pinned]");
    }
    if view.edited {
        flags.push_str(" (edited)");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} {} · {}{}",
        view.id, avatar, view.sender_name, view.timestamp, flags
    );
    if let Some(text) = &view.text {
        let _ = writeln!(out, "    {}", text);
    }
    if view.image.is_some() {
        let _ = writeln!(out, "    [image] `view {}` to open", view.id);
    }

    let mut strip: Vec<String> = view
        .reactions
        .chips
        .iter()
        .map(|chip| {
            let mine = if chip.reacted { "*" } else { "" };
            format!("{}{} {}", mine, chip.emoji, chip.count)
        })
        .collect();
    strip.extend(view.reactions.suggestions.iter().map(|emoji| emoji.to_string()));
    strip.push("+".to_string());
    let _ = writeln!(out, "    {}", strip.join("  "));

    if !view.actions.is_empty() {
        let actions: Vec<&str> = view
            .actions
            .iter()
            .map(|action| match action {
                MessageAction::Edit => "edit",
                MessageAction::Delete => "delete",
                MessageAction::Pin => "pin",
                MessageAction::Unpin => "unpin",
            })
            .collect();
        let _ = writeln!(out, "    ({})", actions.join(" | "));
    }
    out
}

pub fn feed(view: &FeedView) -> String {
    match view {
        FeedView::NoChannel => "Select a channel to start chatting".to_string(),
        FeedView::Empty => EMPTY_FEED.to_string(),
        FeedView::Messages(messages) => messages.iter().map(message).collect(),
    }
}

pub fn pinned(messages: &[MessageView]) -> String {
    if messages.is_empty() {
        return "No pinned messages".to_string();
    }
    messages.iter().map(message).collect()
}

pub fn profile(view: &ProfileView) -> String {
    let mut out = String::new();
    let own = if view.own { " (you)" } else { "" };
    let _ = writeln!(out, "[{}] {}{}", view.initial, view.name, own);
    let _ = writeln!(out, "  {}", view.email);
    let _ = writeln!(out, "  {}", view.bio.as_deref().unwrap_or("No bio yet"));
    out
}

pub fn invite_candidates(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "Everyone is already a member".to_string();
    }
    users
        .iter()
        .map(|user| format!("{:>4}  {}\n", user.id, user.email))
        .collect()
}

pub fn banner(index: usize, notification: &Notification) -> String {
    format!("({}) {} | {}", index, notification.title(), notification.body())
}

pub fn lightbox(lightbox: &Lightbox) -> String {
    let image = lightbox.current();
    let preview: String = image.src.chars().take(48).collect();
    format!(
        "Image {} of message {}: {}…  (next / prev / close)",
        lightbox.counter(),
        image.message_id,
        preview
    )
}

pub fn help() -> String {
    USAGE
        .iter()
        .map(|(_, usage)| format!("  {}\n", usage))
        .collect()
}

/// Lines the rendered feed occupies.
pub fn height(rendered: &str) -> usize {
    rendered.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slackr_client::messages::reactions::{ReactionChip, ReactionStrip};

    fn view(id: u64) -> MessageView {
        MessageView {
            id,
            sender_id: 1,
            sender_name: "Ada".into(),
            avatar: Avatar::Initial('A'),
            text: Some("hi".into()),
            image: None,
            timestamp: "Just now".into(),
            edited: true,
            pinned: false,
            own: true,
            actions: vec![MessageAction::Edit, MessageAction::Delete, MessageAction::Pin],
            reactions: ReactionStrip {
                chips: vec![ReactionChip {
                    emoji: "🔥".into(),
                    count: 2,
                    reacted: true,
                }],
                suggestions: vec!["👍"],
            },
        }
    }

    #[test]
    fn empty_states() {
        assert_eq!(channel_list(&[]), NO_CHANNELS);
        assert_eq!(feed(&FeedView::Empty), EMPTY_FEED);
        assert_eq!(pinned(&[]), "No pinned messages");
    }

    #[test]
    fn message_lines() {
        let rendered = message(&view(9));
        assert!(rendered.starts_with("[9] A Ada · Just now (edited)"));
        assert!(rendered.contains("*🔥 2  👍  +"));
        assert!(rendered.contains("(edit | delete | pin)"));
        assert_eq!(height(&rendered), 4);
    }

    #[test]
    fn channel_markers() {
        let entries = vec![
            ChannelEntry {
                id: 1,
                name: "lobby".into(),
                private: false,
                member: true,
                active: true,
            },
            ChannelEntry {
                id: 2,
                name: "ops".into(),
                private: true,
                member: true,
                active: false,
            },
        ];
        let rendered = channel_list(&entries);
        assert!(rendered.contains(">    1  #lobby\n"));
        assert!(rendered.contains("     2  #ops [private]\n"));
    }
}
