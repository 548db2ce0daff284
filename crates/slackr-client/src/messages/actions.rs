use std::path::Path;

use tracing::info;

use slackr_types::api::MessageBody;
use slackr_types::models::MessageId;

use crate::error::{ClientError, Result};
use crate::messages::feed::MessageFeed;
use crate::messages::images::encode_image_file;

impl MessageFeed {
    /// Sends to the open channel, then reloads it. Text is trimmed; text or
    /// an image is required.
    pub async fn send_message(&self, text: &str, image_path: Option<&Path>) -> Result<()> {
        let text = text.trim();
        if text.is_empty() && image_path.is_none() {
            return Err(ClientError::validation("Message cannot be empty"));
        }
        let channel_id = self.require_channel()?;
        let session = self.session();
        session.offline.ensure_online("send messages")?;

        let image = match image_path {
            Some(path) => Some(encode_image_file(path).await?),
            None => None,
        };
        let body = MessageBody {
            message: (!text.is_empty()).then(|| text.to_string()),
            image,
        };
        session.api.send_message(channel_id, &body).await?;
        info!("Sent message to channel {}", channel_id);

        self.refresh(channel_id).await
    }

    /// Unchanged text with no new image is refused without a request.
    pub async fn edit_message(
        &self,
        message_id: MessageId,
        text: &str,
        image_path: Option<&Path>,
    ) -> Result<()> {
        let channel_id = self.require_channel()?;
        let original = self
            .message(message_id)
            .ok_or_else(|| ClientError::validation("Message not found"))?;

        let text = text.trim();
        if text.is_empty() && image_path.is_none() {
            return Err(ClientError::validation("Message cannot be empty"));
        }
        if image_path.is_none() && original.text().map(str::trim) == Some(text) {
            return Err(ClientError::validation("Message content is unchanged"));
        }
        let session = self.session();
        session.offline.ensure_online("edit messages")?;

        let image = match image_path {
            Some(path) => Some(encode_image_file(path).await?),
            None => None,
        };
        let body = MessageBody {
            message: (!text.is_empty()).then(|| text.to_string()),
            image,
        };
        session
            .api
            .edit_message(channel_id, message_id, &body)
            .await?;

        self.refresh(channel_id).await
    }

    pub async fn delete_message(&self, message_id: MessageId) -> Result<()> {
        let channel_id = self.require_channel()?;
        let session = self.session();
        session.offline.ensure_online("delete messages")?;
        session.api.delete_message(channel_id, message_id).await?;
        self.refresh(channel_id).await
    }

    pub async fn pin_message(&self, message_id: MessageId) -> Result<()> {
        let channel_id = self.require_channel()?;
        let session = self.session();
        session.offline.ensure_online("pin messages")?;
        session.api.pin_message(channel_id, message_id).await?;
        self.refresh(channel_id).await
    }

    pub async fn unpin_message(&self, message_id: MessageId) -> Result<()> {
        let channel_id = self.require_channel()?;
        let session = self.session();
        session.offline.ensure_online("unpin messages")?;
        session.api.unpin_message(channel_id, message_id).await?;
        self.refresh(channel_id).await
    }
}
