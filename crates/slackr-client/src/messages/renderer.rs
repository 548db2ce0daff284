use std::collections::HashMap;

use chrono::{DateTime, Utc};

use slackr_types::models::{Message, MessageId, User, UserId};

use crate::format::{avatar_initial, relative_time};
use crate::messages::reactions::{ReactionStrip, reaction_strip};

pub const EMPTY_FEED: &str = "No messages yet. Start the conversation!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initial(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    Edit,
    Delete,
    Pin,
    Unpin,
}

/// Render-ready message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub avatar: Avatar,
    pub text: Option<String>,
    pub image: Option<String>,
    pub timestamp: String,
    pub edited: bool,
    pub pinned: bool,
    pub own: bool,
    pub actions: Vec<MessageAction>,
    pub reactions: ReactionStrip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    NoChannel,
    Empty,
    Messages(Vec<MessageView>),
}

pub fn render_message(
    message: &Message,
    sender: &User,
    viewer: UserId,
    now: DateTime<Utc>,
) -> MessageView {
    let own = message.sender == viewer;
    let actions = if own {
        let pin = if message.pinned {
            MessageAction::Unpin
        } else {
            MessageAction::Pin
        };
        vec![MessageAction::Edit, MessageAction::Delete, pin]
    } else {
        Vec::new()
    };

    let avatar = match sender.image.as_deref().filter(|image| !image.is_empty()) {
        Some(image) => Avatar::Image(image.to_string()),
        None => Avatar::Initial(avatar_initial(&sender.name)),
    };

    MessageView {
        id: message.id,
        sender_id: message.sender,
        sender_name: sender.name.clone(),
        avatar,
        text: message.text().map(str::to_string),
        image: message.image().map(str::to_string),
        timestamp: relative_time(message.sent_at, now),
        edited: message.edited,
        pinned: message.pinned,
        own,
        actions,
        reactions: reaction_strip(message, viewer),
    }
}

/// Messages must already be in display order. Senders missing from
/// `senders` render as "Unknown User".
pub fn render_messages(
    messages: &[Message],
    senders: &HashMap<UserId, User>,
    viewer: UserId,
    now: DateTime<Utc>,
) -> Vec<MessageView> {
    messages
        .iter()
        .map(|message| match senders.get(&message.sender) {
            Some(sender) => render_message(message, sender, viewer, now),
            None => render_message(message, &User::unknown(message.sender), viewer, now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(id: UserId, name: &str, image: Option<&str>) -> User {
        User {
            id,
            email: format!("{name}@example.com"),
            name: name.into(),
            bio: None,
            image: image.map(str::to_string),
        }
    }

    fn message(id: MessageId, sender: UserId, pinned: bool) -> Message {
        Message {
            id,
            message: Some("hello".into()),
            image: None,
            sender,
            sent_at: Utc::now() - Duration::minutes(5),
            edited: true,
            edited_at: None,
            pinned,
            reacts: Vec::new(),
        }
    }

    #[test]
    fn own_messages_get_actions() {
        let now = Utc::now();
        let view = render_message(&message(1, 7, false), &user(7, "ada", None), 7, now);
        assert!(view.own);
        assert_eq!(
            view.actions,
            vec![MessageAction::Edit, MessageAction::Delete, MessageAction::Pin]
        );
        assert_eq!(view.avatar, Avatar::Initial('A'));
        assert_eq!(view.timestamp, "5 minutes ago");
        assert!(view.edited);

        let pinned = render_message(&message(2, 7, true), &user(7, "ada", None), 7, now);
        assert_eq!(pinned.actions[2], MessageAction::Unpin);
    }

    #[test]
    fn other_messages_have_no_actions() {
        let view = render_message(
            &message(1, 8, false),
            &user(8, "bob", Some("data:image/png;base64,AA==")),
            7,
            Utc::now(),
        );
        assert!(!view.own);
        assert!(view.actions.is_empty());
        assert!(matches!(view.avatar, Avatar::Image(_)));
        assert_eq!(view.reactions.suggestions.len(), 3);
    }

    #[test]
    fn unresolved_sender_is_unknown() {
        let views = render_messages(&[message(1, 9, false)], &HashMap::new(), 7, Utc::now());
        assert_eq!(views[0].sender_name, "Unknown User");
        assert_eq!(views[0].avatar, Avatar::Initial('U'));
    }
}
