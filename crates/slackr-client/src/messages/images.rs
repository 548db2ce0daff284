//! Image attachments: encoding files as data URLs and the per-channel
//! lightbox.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use slackr_types::models::{Message, MessageId};

use crate::error::{ClientError, Result};

/// Reads an image file into a `data:<mime>;base64,` URL. Non-image files are
/// refused.
pub async fn encode_image_file(path: &Path) -> Result<String> {
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(|| ClientError::validation("Please select an image file"))?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::validation(format!("Could not read {}: {}", path.display(), e)))?;

    debug!("Encoded {} ({} bytes, {})", path.display(), bytes.len(), mime);
    Ok(data_url(mime.essence_str(), &bytes))
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub message_id: MessageId,
    pub src: String,
}

/// Every image of a channel in message order.
pub fn gallery(messages: &[Message]) -> Vec<GalleryImage> {
    messages
        .iter()
        .filter_map(|message| {
            message.image().map(|src| GalleryImage {
                message_id: message.id,
                src: src.to_string(),
            })
        })
        .collect()
}

/// Viewer cycling through a channel's images, wrapping at both ends.
#[derive(Debug, Clone)]
pub struct Lightbox {
    images: Vec<GalleryImage>,
    index: usize,
}

impl Lightbox {
    /// Opens on the image attached to `message_id`.
    pub fn open(images: Vec<GalleryImage>, message_id: MessageId) -> Option<Self> {
        let index = images
            .iter()
            .position(|image| image.message_id == message_id)?;
        Some(Self { images, index })
    }

    pub fn current(&self) -> &GalleryImage {
        &self.images[self.index]
    }

    pub fn next(&mut self) -> &GalleryImage {
        self.index = (self.index + 1) % self.images.len();
        self.current()
    }

    pub fn prev(&mut self) -> &GalleryImage {
        self.index = (self.index + self.images.len() - 1) % self.images.len();
        self.current()
    }

    /// "i / n", one-based.
    pub fn counter(&self) -> String {
        format!("{} / {}", self.index + 1, self.images.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(id: MessageId, image: Option<&str>) -> Message {
        Message {
            id,
            message: Some("x".into()),
            image: image.map(str::to_string),
            sender: 1,
            sent_at: Utc::now(),
            edited: false,
            edited_at: None,
            pinned: false,
            reacts: Vec::new(),
        }
    }

    #[test]
    fn lightbox_wraps_both_ways() {
        let messages = vec![
            message(1, Some("a")),
            message(2, None),
            message(3, Some("b")),
            message(4, Some("c")),
        ];
        let mut lightbox = Lightbox::open(gallery(&messages), 3).unwrap();
        assert_eq!(lightbox.counter(), "2 / 3");
        assert_eq!(lightbox.next().src, "c");
        assert_eq!(lightbox.next().src, "a");
        assert_eq!(lightbox.prev().src, "c");
        assert_eq!(lightbox.counter(), "3 / 3");
    }

    #[test]
    fn lightbox_needs_an_image() {
        let messages = vec![message(1, None)];
        assert!(Lightbox::open(gallery(&messages), 1).is_none());
    }

    #[test]
    fn data_url_prefix() {
        assert_eq!(data_url("image/png", &[0, 0]), "data:image/png;base64,AAA=");
    }

    #[tokio::test]
    async fn non_image_files_are_refused() {
        let err = encode_image_file(Path::new("notes.txt")).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
    }
}
