use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info};

use slackr_types::models::{ChannelId, Message, MessageId, User, UserId};

use crate::error::{ClientError, Result};
use crate::lock;
use crate::messages::images::{GalleryImage, Lightbox, gallery};
use crate::messages::renderer::{FeedView, MessageView, render_messages};
use crate::messages::scroll::Paginator;
use crate::offline::{Source, messages_key};
use crate::session::Session;

/// Result of a scroll-to-top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Loaded { added: usize, has_more: bool },
    /// Another page fetch is in flight.
    Busy,
    /// No channel open, or history exhausted.
    Exhausted,
    /// The channel changed or was reloaded while the page was in flight.
    Stale,
}

#[derive(Default)]
struct FeedState {
    /// Ascending by send time.
    messages: Vec<Message>,
    senders: HashMap<UserId, User>,
    paginator: Paginator,
    source: Option<Source>,
}

/// Messages of the open channel.
///
/// All methods take `&self` so the poller's reload and user actions can
/// interleave. The state lock is never held across an await; every answer is
/// checked against the paginator epoch before it is applied.
pub struct MessageFeed {
    session: Arc<Session>,
    state: Mutex<FeedState>,
}

impl MessageFeed {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            state: Mutex::new(FeedState::default()),
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub fn channel(&self) -> Option<ChannelId> {
        lock(&self.state).paginator.channel()
    }

    pub(crate) fn require_channel(&self) -> Result<ChannelId> {
        self.channel()
            .ok_or_else(|| ClientError::validation("Please select a channel first"))
    }

    /// Loads the newest page of `channel_id`, replacing whatever was shown.
    /// Switching channel drops the previous list first.
    pub async fn load_messages(&self, channel_id: ChannelId) -> Result<()> {
        let epoch = {
            let mut state = lock(&self.state);
            if state.paginator.channel() != Some(channel_id) {
                state.messages.clear();
                state.source = None;
            }
            state.paginator.reset(Some(channel_id))
        };

        let api = &self.session.api;
        let fetched = self
            .session
            .offline
            .read_through(&messages_key(channel_id), "messages", || {
                api.list_messages(channel_id, 0)
            })
            .await?;

        let mut messages = fetched.value;
        sort_ascending(&mut messages);
        let senders = self
            .session
            .users
            .resolve_many(messages.iter().map(|message| message.sender))
            .await;

        let mut state = lock(&self.state);
        if !state.paginator.is_current(epoch) {
            debug!("Dropping stale message list for channel {}", channel_id);
            return Ok(());
        }
        state.paginator.first_page_loaded(messages.len());
        debug!(
            "Loaded {} messages for channel {} ({:?})",
            messages.len(),
            channel_id,
            fetched.source
        );
        state.messages = messages;
        state.senders.extend(senders);
        state.source = Some(fetched.source);
        Ok(())
    }

    /// Reloads `channel_id` if it is still the open channel.
    pub(crate) async fn refresh(&self, channel_id: ChannelId) -> Result<()> {
        if self.channel() == Some(channel_id) {
            self.load_messages(channel_id).await
        } else {
            Ok(())
        }
    }

    /// Fetches the next older page and prepends it. Never overlaps with
    /// another page fetch.
    pub async fn load_more(&self) -> Result<LoadMore> {
        let request = {
            let mut state = lock(&self.state);
            match state.paginator.begin() {
                Some(request) => request,
                None if state.paginator.is_loading() => return Ok(LoadMore::Busy),
                None => return Ok(LoadMore::Exhausted),
            }
        };

        if !self.session.offline.is_online() {
            lock(&self.state).paginator.fail(request);
            return Err(ClientError::Unavailable(
                "Older messages are not available offline".to_string(),
            ));
        }

        let page = match self
            .session
            .api
            .list_messages(request.channel_id, request.offset)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                lock(&self.state).paginator.fail(request);
                return Err(e.into());
            }
        };
        let senders = self
            .session
            .users
            .resolve_many(page.iter().map(|message| message.sender))
            .await;

        let mut state = lock(&self.state);
        if !state.paginator.complete(request, page.len()) {
            debug!("Dropping stale page at offset {}", request.offset);
            return Ok(LoadMore::Stale);
        }

        let known: HashSet<MessageId> = state.messages.iter().map(|message| message.id).collect();
        let mut older: Vec<Message> = page
            .into_iter()
            .filter(|message| !known.contains(&message.id))
            .collect();
        let added = older.len();
        older.append(&mut state.messages);
        sort_ascending(&mut older);
        state.messages = older;
        state.senders.extend(senders);

        let has_more = state.paginator.has_more();
        info!(
            "Loaded {} older messages for channel {}",
            added, request.channel_id
        );
        Ok(LoadMore::Loaded { added, has_more })
    }

    /// Forgets the open channel.
    pub fn close(&self) {
        let mut state = lock(&self.state);
        state.paginator.reset(None);
        state.messages.clear();
        state.senders.clear();
        state.source = None;
    }

    pub fn view(&self) -> Result<FeedView> {
        let viewer = self.session.user_id()?;
        let state = lock(&self.state);
        if state.paginator.channel().is_none() {
            return Ok(FeedView::NoChannel);
        }
        if state.messages.is_empty() {
            return Ok(FeedView::Empty);
        }
        Ok(FeedView::Messages(render_messages(
            &state.messages,
            &state.senders,
            viewer,
            Utc::now(),
        )))
    }

    /// Pinned messages of the open channel, oldest first.
    pub fn pinned(&self) -> Result<Vec<MessageView>> {
        let viewer = self.session.user_id()?;
        let state = lock(&self.state);
        let pinned: Vec<Message> = state
            .messages
            .iter()
            .filter(|message| message.pinned)
            .cloned()
            .collect();
        Ok(render_messages(&pinned, &state.senders, viewer, Utc::now()))
    }

    pub fn gallery(&self) -> Vec<GalleryImage> {
        gallery(&lock(&self.state).messages)
    }

    /// Lightbox over the open channel's images, starting at `message_id`.
    pub fn lightbox(&self, message_id: MessageId) -> Option<Lightbox> {
        Lightbox::open(self.gallery(), message_id)
    }

    pub fn message(&self, message_id: MessageId) -> Option<Message> {
        lock(&self.state)
            .messages
            .iter()
            .find(|message| message.id == message_id)
            .cloned()
    }

    pub fn messages(&self) -> Vec<Message> {
        lock(&self.state).messages.clone()
    }

    /// Whether the current list came from the offline cache.
    pub fn is_cached(&self) -> bool {
        matches!(lock(&self.state).source, Some(Source::Cache { .. }))
    }

    pub fn has_more(&self) -> bool {
        lock(&self.state).paginator.has_more()
    }

    pub fn is_loading_more(&self) -> bool {
        lock(&self.state).paginator.is_loading()
    }
}

fn sort_ascending(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.id.cmp(&b.id)));
}
