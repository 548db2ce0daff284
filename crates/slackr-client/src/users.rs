use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use tracing::{debug, warn};

use slackr_api::ApiClient;
use slackr_types::api::UpdateProfileRequest;
use slackr_types::events::ClientEvent;
use slackr_types::models::{Channel, ChannelId, User, UserId, UserSummary};

use crate::error::{ClientError, Result};
use crate::format::avatar_initial;
use crate::lock;
use crate::messages::images::encode_image_file;
use crate::offline::{OfflineManager, channel_key, user_key};
use crate::session::Session;

/// Per-session cache of user details keyed by id, backed by the offline
/// snapshot cache.
pub struct UserDirectory {
    api: ApiClient,
    offline: Arc<OfflineManager>,
    cache: Mutex<HashMap<UserId, User>>,
}

impl UserDirectory {
    pub fn new(api: ApiClient, offline: Arc<OfflineManager>) -> Self {
        Self {
            api,
            offline,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cached lookup. Only successful answers are cached. Offline, only
    /// snapshots are consulted.
    pub async fn lookup(&self, user_id: UserId) -> Result<User> {
        if let Some(user) = lock(&self.cache).get(&user_id) {
            return Ok(user.clone());
        }
        let api = &self.api;
        let user = self
            .offline
            .read_through(&user_key(user_id), "user details", || {
                api.user_details(user_id)
            })
            .await?
            .value;
        lock(&self.cache).insert(user_id, user.clone());
        Ok(user)
    }

    /// Like [`lookup`](Self::lookup) but falls back to "Unknown User".
    pub async fn resolve(&self, user_id: UserId) -> User {
        match self.lookup(user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not resolve user {}: {}", user_id, e);
                User::unknown(user_id)
            }
        }
    }

    /// Resolves every distinct id concurrently.
    pub async fn resolve_many<I>(&self, ids: I) -> HashMap<UserId, User>
    where
        I: IntoIterator<Item = UserId>,
    {
        let distinct: HashSet<UserId> = ids.into_iter().collect();
        let users = join_all(distinct.into_iter().map(|id| self.resolve(id))).await;
        users.into_iter().map(|user| (user.id, user)).collect()
    }

    pub fn invalidate(&self, user_id: UserId) {
        lock(&self.cache).remove(&user_id);
    }

    pub fn clear(&self) {
        let mut cache = lock(&self.cache);
        debug!("Dropping {} cached users", cache.len());
        cache.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub initial: char,
    pub own: bool,
}

/// Form contents of the profile editor. Empty optional fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    pub password: Option<String>,
    pub image_path: Option<PathBuf>,
}

/// Profile viewing and editing, and inviting users to channels.
pub struct UserManager {
    session: Arc<Session>,
}

impl UserManager {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// `None` shows the logged-in user's own profile.
    pub async fn profile(&self, user_id: Option<UserId>) -> Result<ProfileView> {
        let me = self.session.user_id()?;
        let id = user_id.unwrap_or(me);
        let user = self.session.users.lookup(id).await?;
        Ok(ProfileView {
            id,
            initial: avatar_initial(&user.name),
            name: user.name,
            email: user.email,
            bio: user.bio.filter(|bio| !bio.trim().is_empty()),
            image: user.image,
            own: id == me,
        })
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        let email = update.email.trim();
        let name = update.name.trim();
        if email.is_empty() || name.is_empty() {
            return Err(ClientError::validation("Email and name are required"));
        }
        self.session.offline.ensure_online("update your profile")?;

        let image = match &update.image_path {
            Some(path) => Some(encode_image_file(path).await?),
            None => None,
        };
        let request = UpdateProfileRequest {
            email: email.to_string(),
            name: name.to_string(),
            bio: update.bio.map(|bio| bio.trim().to_string()),
            image,
            password: update.password.filter(|password| !password.is_empty()),
        };

        self.session.api.update_profile(&request).await?;

        let me = self.session.user_id()?;
        self.session.users.invalidate(me);
        self.session.auth.save_name(name)?;
        Ok(())
    }

    /// Users who are not yet members of the channel, by email.
    pub async fn invite_candidates(&self, channel_id: ChannelId) -> Result<Vec<UserSummary>> {
        let api = &self.session.api;
        let channel: Channel = self
            .session
            .offline
            .read_through(&channel_key(channel_id), "channel details", || {
                api.channel_details(channel_id)
            })
            .await?
            .value;

        let mut users: Vec<UserSummary> = api
            .list_users()
            .await?
            .into_iter()
            .filter(|user| !channel.is_member(user.id))
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    pub async fn invite(&self, channel_id: ChannelId, user_id: UserId) -> Result<()> {
        self.session.offline.ensure_online("invite users")?;
        self.session.api.invite_to_channel(channel_id, user_id).await?;
        self.session.events.publish(ClientEvent::ChannelsChanged);
        Ok(())
    }
}
