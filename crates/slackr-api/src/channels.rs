use slackr_types::api::{
    ChannelsResponse, CreateChannelRequest, CreateChannelResponse, InviteRequest,
    UpdateChannelRequest,
};
use slackr_types::models::{Channel, ChannelId, ChannelSummary, UserId};

use crate::client::{ApiClient, Empty};
use crate::error::Result;

impl ApiClient {
    pub async fn list_channels(&self) -> Result<Vec<ChannelSummary>> {
        let resp: ChannelsResponse = self.get("/channel").await?;
        Ok(resp.channels)
    }

    pub async fn create_channel(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<ChannelId> {
        let body = CreateChannelRequest {
            name: name.to_string(),
            description: description.to_string(),
            private,
        };
        let resp: CreateChannelResponse = self.post("/channel", Some(&body)).await?;
        Ok(resp.channel_id)
    }

    /// `GET /channel/{id}`; the id is filled in from the request path.
    pub async fn channel_details(&self, channel_id: ChannelId) -> Result<Channel> {
        let mut channel: Channel = self.get(&format!("/channel/{}", channel_id)).await?;
        channel.id = channel_id;
        Ok(channel)
    }

    pub async fn update_channel(
        &self,
        channel_id: ChannelId,
        name: &str,
        description: &str,
    ) -> Result<()> {
        let body = UpdateChannelRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let _: Empty = self.put(&format!("/channel/{}", channel_id), &body).await?;
        Ok(())
    }

    pub async fn join_channel(&self, channel_id: ChannelId) -> Result<()> {
        let _: Empty = self
            .post(&format!("/channel/{}/join", channel_id), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn leave_channel(&self, channel_id: ChannelId) -> Result<()> {
        let _: Empty = self
            .post(&format!("/channel/{}/leave", channel_id), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn invite_to_channel(&self, channel_id: ChannelId, user_id: UserId) -> Result<()> {
        let body = InviteRequest { user_id };
        let _: Empty = self
            .post(&format!("/channel/{}/invite", channel_id), Some(&body))
            .await?;
        Ok(())
    }
}
