use slackr_types::api::ReactRequest;
use slackr_types::models::{ChannelId, MessageId};

use crate::client::{ApiClient, Empty};
use crate::error::Result;

impl ApiClient {
    pub async fn react(&self, channel_id: ChannelId, message_id: MessageId, emoji: &str) -> Result<()> {
        self.reaction_call("react", channel_id, message_id, emoji).await
    }

    pub async fn unreact(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<()> {
        self.reaction_call("unreact", channel_id, message_id, emoji)
            .await
    }

    pub async fn pin_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        let _: Empty = self
            .post(&format!("/message/pin/{}/{}", channel_id, message_id), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn unpin_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        let _: Empty = self
            .post(&format!("/message/unpin/{}/{}", channel_id, message_id), None::<&()>)
            .await?;
        Ok(())
    }

    async fn reaction_call(
        &self,
        verb: &str,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<()> {
        let body = ReactRequest {
            react: emoji.to_string(),
        };
        let _: Empty = self
            .post(&format!("/message/{}/{}/{}", verb, channel_id, message_id), Some(&body))
            .await?;
        Ok(())
    }
}
