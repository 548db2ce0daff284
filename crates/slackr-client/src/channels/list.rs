use std::sync::{Arc, Mutex};

use tracing::debug;

use slackr_types::models::{ChannelId, ChannelSummary, UserId};

use crate::error::Result;
use crate::lock;
use crate::offline::{CHANNELS_KEY, Fetched};
use crate::session::Session;

pub const NO_CHANNELS: &str = "No channels available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: ChannelId,
    pub name: String,
    pub private: bool,
    pub member: bool,
    pub active: bool,
}

/// Public channels first, then private, each by name. Private channels the
/// viewer is not a member of are left out.
pub fn render_channel_list(
    channels: &[ChannelSummary],
    viewer: UserId,
    active: Option<ChannelId>,
) -> Vec<ChannelEntry> {
    let mut visible: Vec<&ChannelSummary> = channels
        .iter()
        .filter(|channel| channel.visible_to(viewer))
        .collect();
    visible.sort_by(|a, b| a.private.cmp(&b.private).then_with(|| a.name.cmp(&b.name)));

    visible
        .into_iter()
        .map(|channel| ChannelEntry {
            id: channel.id,
            name: channel.name.clone(),
            private: channel.private,
            member: channel.is_member(viewer),
            active: active == Some(channel.id),
        })
        .collect()
}

#[derive(Default)]
struct ListState {
    channels: Vec<ChannelSummary>,
    active: Option<ChannelId>,
}

/// Sidebar channel list.
pub struct ChannelList {
    session: Arc<Session>,
    state: Mutex<ListState>,
}

impl ChannelList {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            state: Mutex::new(ListState::default()),
        }
    }

    /// Fetches the list (or its cached snapshot) and keeps it for rendering.
    pub async fn load(&self) -> Result<Fetched<Vec<ChannelSummary>>> {
        let api = &self.session.api;
        let fetched = self
            .session
            .offline
            .read_through(CHANNELS_KEY, "channels", || api.list_channels())
            .await?;
        debug!("Loaded {} channels", fetched.value.len());
        lock(&self.state).channels = fetched.value.clone();
        Ok(fetched)
    }

    pub fn find(&self, channel_id: ChannelId) -> Option<ChannelSummary> {
        lock(&self.state)
            .channels
            .iter()
            .find(|channel| channel.id == channel_id)
            .cloned()
    }

    pub fn set_active(&self, channel_id: Option<ChannelId>) {
        lock(&self.state).active = channel_id;
    }

    pub fn active(&self) -> Option<ChannelId> {
        lock(&self.state).active
    }

    pub fn render(&self) -> Result<Vec<ChannelEntry>> {
        let viewer = self.session.user_id()?;
        let state = lock(&self.state);
        Ok(render_channel_list(&state.channels, viewer, state.active))
    }

    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.channels.clear();
        state.active = None;
    }
}
