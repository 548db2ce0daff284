use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ChannelId = u64;
pub type MessageId = u64;

/// Channel as returned by `GET /channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: ChannelId,
    pub name: String,
    pub creator: UserId,
    pub private: bool,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl ChannelSummary {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    /// Private channels are only listed to their members.
    pub fn visible_to(&self, user_id: UserId) -> bool {
        !self.private || self.is_member(user_id)
    }
}

/// Channel as returned by `GET /channel/{id}`. The backend omits the id,
/// so the client fills it in after the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub id: ChannelId,
    pub name: String,
    pub creator: UserId,
    #[serde(default)]
    pub description: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl Channel {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_creator(&self, user_id: UserId) -> bool {
        self.creator == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct React {
    pub user: UserId,
    pub react: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub sender: UserId,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub reacts: Vec<React>,
}

impl Message {
    /// Non-blank message text, if any.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|text| !text.trim().is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.is_empty())
    }

    /// A message always carries text, an image, or both.
    pub fn has_content(&self) -> bool {
        self.text().is_some() || self.image().is_some()
    }

    pub fn has_reacted(&self, user_id: UserId, emoji: &str) -> bool {
        self.reacts
            .iter()
            .any(|react| react.user == user_id && react.react == emoji)
    }

    /// Short text shown in notifications.
    pub fn preview(&self) -> String {
        match self.text() {
            Some(text) => text.to_string(),
            None => "(Image)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// Placeholder used when a user cannot be resolved.
    pub fn unknown(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            name: "Unknown User".to_string(),
            bio: None,
            image: None,
        }
    }
}

/// Entry of `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
}
