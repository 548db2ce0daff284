use std::sync::Arc;

use tracing::warn;

use slackr_types::models::{Channel, ChannelId, UserId};

use crate::error::Result;
use crate::format::date;
use crate::offline::{Fetched, channel_key};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelAction {
    Join,
    Leave,
    Edit,
}

/// Members may leave, and creators may also edit. Outsiders may only join
/// public channels.
pub fn available_actions(member: bool, creator: bool, private: bool) -> Vec<ChannelAction> {
    if member {
        let mut actions = vec![ChannelAction::Leave];
        if creator {
            actions.push(ChannelAction::Edit);
        }
        actions
    } else if !private {
        vec![ChannelAction::Join]
    } else {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetailsView {
    pub id: ChannelId,
    pub name: String,
    pub description: String,
    pub visibility: &'static str,
    pub created: String,
    pub creator_name: String,
    pub member_count: usize,
    pub actions: Vec<ChannelAction>,
}

pub struct ChannelDetails {
    session: Arc<Session>,
}

impl ChannelDetails {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub async fn fetch(&self, channel_id: ChannelId) -> Result<Fetched<Channel>> {
        let api = &self.session.api;
        self.session
            .offline
            .read_through(&channel_key(channel_id), "channel details", || {
                api.channel_details(channel_id)
            })
            .await
    }

    pub async fn view(&self, channel: &Channel) -> Result<ChannelDetailsView> {
        let viewer = self.session.user_id()?;
        Ok(self.render(channel, viewer).await)
    }

    async fn render(&self, channel: &Channel, viewer: UserId) -> ChannelDetailsView {
        let creator_name = match self.session.users.lookup(channel.creator).await {
            Ok(user) => user.name,
            Err(e) => {
                warn!("Could not resolve creator of channel {}: {}", channel.id, e);
                "Unknown".to_string()
            }
        };

        let description = if channel.description.trim().is_empty() {
            "No description".to_string()
        } else {
            channel.description.clone()
        };

        ChannelDetailsView {
            id: channel.id,
            name: channel.name.clone(),
            description,
            visibility: if channel.private { "Private" } else { "Public" },
            created: date(channel.created_at),
            creator_name,
            member_count: channel.members.len(),
            actions: available_actions(
                channel.is_member(viewer),
                channel.is_creator(viewer),
                channel.private,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_by_membership() {
        assert_eq!(
            available_actions(true, true, true),
            vec![ChannelAction::Leave, ChannelAction::Edit]
        );
        assert_eq!(available_actions(true, false, false), vec![ChannelAction::Leave]);
        assert_eq!(available_actions(false, false, false), vec![ChannelAction::Join]);
        assert!(available_actions(false, false, true).is_empty());
    }
}
