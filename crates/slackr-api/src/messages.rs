use slackr_types::api::{MessageBody, MessagesResponse};
use slackr_types::models::{ChannelId, Message, MessageId};

use crate::client::{ApiClient, Empty};
use crate::error::Result;

/// Messages per page returned by `GET /message/{channelId}`.
pub const PAGE_SIZE: usize = 25;

impl ApiClient {
    /// One page of messages, newest first, starting `start` messages back.
    pub async fn list_messages(&self, channel_id: ChannelId, start: usize) -> Result<Vec<Message>> {
        let resp: MessagesResponse = self
            .get(&format!("/message/{}?start={}", channel_id, start))
            .await?;
        Ok(resp.messages)
    }

    pub async fn send_message(&self, channel_id: ChannelId, body: &MessageBody) -> Result<()> {
        let _: Empty = self
            .post(&format!("/message/{}", channel_id), Some(body))
            .await?;
        Ok(())
    }

    pub async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        body: &MessageBody,
    ) -> Result<()> {
        let _: Empty = self
            .put(&format!("/message/{}/{}", channel_id, message_id), body)
            .await?;
        Ok(())
    }

    pub async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        let _: Empty = self
            .delete(&format!("/message/{}/{}", channel_id, message_id))
            .await?;
        Ok(())
    }
}
