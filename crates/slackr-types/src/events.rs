use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ChannelId, MessageId, UserId};

/// A new message from someone else, detected by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub message_id: MessageId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_image: Option<String>,
    pub preview: String,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn title(&self) -> String {
        format!("New message in {}", self.channel_name)
    }

    pub fn body(&self) -> String {
        format!("{}: {}", self.sender_name, self.preview)
    }
}

/// Events published on the client event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientEvent {
    /// Connectivity flipped
    OnlineStatusChanged { online: bool },

    /// A message from another user arrived in a joined channel
    Notification(Notification),

    /// The open channel has new messages and was reloaded
    ChannelMessagesChanged {
        channel_id: ChannelId,
        message_ids: Vec<MessageId>,
    },

    /// Channel membership or metadata changed locally
    ChannelsChanged,

    /// The session was closed (logout or expired token)
    SessionEnded,

    /// A user-facing error that should be shown in the error popup
    ErrorRaised { message: String },
}

impl ClientEvent {
    /// Returns the channel this event is scoped to, if any.
    pub fn channel_id(&self) -> Option<ChannelId> {
        match self {
            Self::Notification(notification) => Some(notification.channel_id),
            Self::ChannelMessagesChanged { channel_id, .. } => Some(*channel_id),
            _ => None,
        }
    }
}
