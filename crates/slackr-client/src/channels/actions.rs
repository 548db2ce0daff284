use std::sync::Arc;

use tracing::info;

use slackr_types::events::ClientEvent;
use slackr_types::models::ChannelId;

use crate::error::{ClientError, Result};
use crate::session::Session;

/// Channel writes. Each one publishes `ChannelsChanged` on success.
pub struct ChannelActions {
    session: Arc<Session>,
}

impl ChannelActions {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub async fn create(&self, name: &str, description: &str, private: bool) -> Result<ChannelId> {
        let name = required_name(name)?;
        self.session.offline.ensure_online("create channels")?;

        let channel_id = self
            .session
            .api
            .create_channel(name, description.trim(), private)
            .await?;
        info!("Created channel {} ({})", name, channel_id);
        self.changed();
        Ok(channel_id)
    }

    pub async fn edit(&self, channel_id: ChannelId, name: &str, description: &str) -> Result<()> {
        let name = required_name(name)?;
        self.session.offline.ensure_online("edit channels")?;
        self.session
            .api
            .update_channel(channel_id, name, description.trim())
            .await?;
        self.changed();
        Ok(())
    }

    pub async fn join(&self, channel_id: ChannelId) -> Result<()> {
        self.session.offline.ensure_online("join channels")?;
        self.session.api.join_channel(channel_id).await?;
        info!("Joined channel {}", channel_id);
        self.changed();
        Ok(())
    }

    pub async fn leave(&self, channel_id: ChannelId) -> Result<()> {
        self.session.offline.ensure_online("leave channels")?;
        self.session.api.leave_channel(channel_id).await?;
        info!("Left channel {}", channel_id);
        self.changed();
        Ok(())
    }

    fn changed(&self) {
        self.session.events.publish(ClientEvent::ChannelsChanged);
    }
}

fn required_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(ClientError::validation("Channel name is required"))
    } else {
        Ok(name)
    }
}
