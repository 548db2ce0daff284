use tracing::debug;

use slackr_types::models::{ChannelId, Message, MessageId, UserId};

use crate::error::{ClientError, Result};
use crate::messages::feed::MessageFeed;

/// Quick-reaction palette, also the full picker behind "add more".
pub const QUICK_EMOJIS: [&str; 12] = [
    "👍", "❤️", "😄", "😮", "😢", "😡", "🎉", "🔥", "👏", "✅", "❌", "👀",
];

const SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionChip {
    pub emoji: String,
    pub count: usize,
    pub reacted: bool,
}

/// Always rendered, even for a message nobody reacted to. The "add more"
/// affordance opening [`QUICK_EMOJIS`] follows the suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionStrip {
    pub chips: Vec<ReactionChip>,
    pub suggestions: Vec<&'static str>,
}

/// One chip per distinct emoji in first-use order, then up to three quick
/// emojis nobody used yet.
pub fn reaction_strip(message: &Message, viewer: UserId) -> ReactionStrip {
    let mut chips: Vec<ReactionChip> = Vec::new();
    for react in &message.reacts {
        match chips.iter_mut().find(|chip| chip.emoji == react.react) {
            Some(chip) => {
                chip.count += 1;
                chip.reacted |= react.user == viewer;
            }
            None => chips.push(ReactionChip {
                emoji: react.react.clone(),
                count: 1,
                reacted: react.user == viewer,
            }),
        }
    }

    let suggestions = QUICK_EMOJIS
        .iter()
        .copied()
        .filter(|emoji| !chips.iter().any(|chip| chip.emoji == *emoji))
        .take(SUGGESTIONS)
        .collect();

    ReactionStrip { chips, suggestions }
}

impl MessageFeed {
    /// Unreacts if the viewer already used `emoji` on `message`, reacts
    /// otherwise, then reloads the channel. No local patching.
    pub async fn toggle_reaction(
        &self,
        channel_id: ChannelId,
        message: &Message,
        emoji: &str,
    ) -> Result<()> {
        let session = self.session();
        let viewer = session.user_id()?;
        session.offline.ensure_online("react to messages")?;

        if message.has_reacted(viewer, emoji) {
            debug!("Removing {} from message {}", emoji, message.id);
            session.api.unreact(channel_id, message.id, emoji).await?;
        } else {
            debug!("Adding {} to message {}", emoji, message.id);
            session.api.react(channel_id, message.id, emoji).await?;
        }

        self.refresh(channel_id).await
    }

    /// [`toggle_reaction`](Self::toggle_reaction) on a message of the open
    /// channel.
    pub async fn toggle_reaction_on(&self, message_id: MessageId, emoji: &str) -> Result<()> {
        let channel_id = self.require_channel()?;
        let message = self
            .message(message_id)
            .ok_or_else(|| ClientError::validation("Message not found"))?;
        self.toggle_reaction(channel_id, &message, emoji).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use slackr_types::models::React;

    fn message_with(reacts: &[(UserId, &str)]) -> Message {
        Message {
            id: 1,
            message: Some("hi".into()),
            image: None,
            sender: 1,
            sent_at: Utc::now(),
            edited: false,
            edited_at: None,
            pinned: false,
            reacts: reacts
                .iter()
                .map(|(user, react)| React {
                    user: *user,
                    react: react.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn untouched_message_gets_three_suggestions() {
        let strip = reaction_strip(&message_with(&[]), 1);
        assert!(strip.chips.is_empty());
        assert_eq!(strip.suggestions, vec!["👍", "❤️", "😄"]);
    }

    #[test]
    fn used_emojis_are_counted_and_skipped_in_suggestions() {
        let strip = reaction_strip(&message_with(&[(2, "👍"), (3, "👍"), (1, "🔥")]), 1);
        assert_eq!(
            strip.chips,
            vec![
                ReactionChip {
                    emoji: "👍".into(),
                    count: 2,
                    reacted: false
                },
                ReactionChip {
                    emoji: "🔥".into(),
                    count: 1,
                    reacted: true
                },
            ]
        );
        assert_eq!(strip.suggestions, vec!["❤️", "😄", "😮"]);
    }

    #[test]
    fn custom_emoji_does_not_consume_suggestions() {
        let strip = reaction_strip(&message_with(&[(2, "🦀")]), 1);
        assert_eq!(strip.chips.len(), 1);
        assert_eq!(strip.suggestions.len(), 3);
    }
}
