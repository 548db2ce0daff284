//! New-message detection by polling, and the in-app banner stack.
//!
//! There is no push channel: every tick fetches the channel list and the
//! newest page of each joined channel, and compares message ids against the
//! highest id seen so far for that channel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, join_all};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use slackr_types::events::{ClientEvent, Notification};
use slackr_types::models::{ChannelId, ChannelSummary, MessageId, UserId};

use crate::error::Result;
use crate::lock;
use crate::session::Session;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Shorter intervals, including zero, are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Called with the ids of new messages in the open channel.
pub type NewMessagesCallback =
    Arc<dyn Fn(ChannelId, Vec<MessageId>) -> BoxFuture<'static, ()> + Send + Sync>;

pub struct NotificationPoller {
    inner: Arc<PollerInner>,
    task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

struct PollerInner {
    session: Arc<Session>,
    interval: Duration,
    last_seen: Mutex<HashMap<ChannelId, MessageId>>,
    current_channel: Mutex<Option<ChannelId>>,
    on_new_messages: Mutex<Option<NewMessagesCallback>>,
}

impl NotificationPoller {
    pub fn new(session: Arc<Session>, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!("Poll interval {:?} too short, using {:?}", interval, MIN_POLL_INTERVAL);
        }
        Self {
            inner: Arc::new(PollerInner {
                session,
                interval: interval.max(MIN_POLL_INTERVAL),
                last_seen: Mutex::new(HashMap::new()),
                current_channel: Mutex::new(None),
                on_new_messages: Mutex::new(None),
            }),
            task: Mutex::new(None),
        }
    }

    pub fn on_new_messages(&self, callback: NewMessagesCallback) {
        *lock(&self.inner.on_new_messages) = Some(callback);
    }

    pub fn set_current_channel(&self, channel_id: Option<ChannelId>) {
        *lock(&self.inner.current_channel) = channel_id;
    }

    /// Raises the baseline for `channel_id` to at least `message_id`.
    pub fn mark_seen(&self, channel_id: ChannelId, message_id: MessageId) {
        let mut last_seen = lock(&self.inner.last_seen);
        let entry = last_seen.entry(channel_id).or_insert(message_id);
        *entry = (*entry).max(message_id);
    }

    pub fn last_seen(&self, channel_id: ChannelId) -> Option<MessageId> {
        lock(&self.inner.last_seen).get(&channel_id).copied()
    }

    /// Spawns the polling task, replacing a running one.
    pub fn start(&self) {
        self.stop();

        let token = CancellationToken::new();
        let inner = self.inner.clone();
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let notified = inner.tick().await;
                        if notified > 0 {
                            info!("Poll: {} new message notifications", notified);
                        }
                    }
                }
            }
            debug!("Notification poller stopped");
        });

        info!("Notification poller started ({:?} interval)", self.inner.interval);
        *lock(&self.task) = Some((token, handle));
    }

    pub fn stop(&self) {
        if let Some((token, _handle)) = lock(&self.task).take() {
            token.cancel();
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn is_running(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    /// Forgets every baseline and the open channel. Used on logout.
    pub fn reset(&self) {
        lock(&self.inner.last_seen).clear();
        *lock(&self.inner.current_channel) = None;
    }

    /// Runs one tick inline and returns the notifications it published.
    pub async fn poll_once(&self) -> Result<Vec<Notification>> {
        self.inner.poll().await
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PollerInner {
    /// Never fails: errors are logged and the next tick retries.
    async fn tick(&self) -> usize {
        match self.poll().await {
            Ok(notifications) => notifications.len(),
            Err(e) => {
                warn!("Poll failed: {}", e);
                0
            }
        }
    }

    async fn poll(&self) -> Result<Vec<Notification>> {
        if !self.session.offline.is_online() {
            debug!("Offline, skipping poll");
            return Ok(Vec::new());
        }
        let viewer = self.session.user_id()?;

        let joined: Vec<ChannelSummary> = self
            .session
            .api
            .list_channels()
            .await?
            .into_iter()
            .filter(|channel| channel.is_member(viewer))
            .collect();

        let checks = joined.iter().map(|channel| self.check_channel(channel, viewer));
        let notifications: Vec<Notification> = join_all(checks).await.into_iter().flatten().collect();

        for notification in &notifications {
            self.session
                .events
                .publish(ClientEvent::Notification(notification.clone()));
        }
        Ok(notifications)
    }

    async fn check_channel(&self, channel: &ChannelSummary, viewer: UserId) -> Vec<Notification> {
        let page = match self.session.api.list_messages(channel.id, 0).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Poll of channel {} failed: {}", channel.id, e);
                return Vec::new();
            }
        };
        let Some(newest) = page.iter().map(|message| message.id).max() else {
            return Vec::new();
        };

        let previous = {
            let mut last_seen = lock(&self.last_seen);
            let previous = last_seen.get(&channel.id).copied();
            last_seen.insert(channel.id, previous.map_or(newest, |seen| seen.max(newest)));
            previous
        };
        let Some(previous) = previous else {
            debug!("Seeded channel {} at message {}", channel.id, newest);
            return Vec::new();
        };

        let mut fresh: Vec<_> = page
            .into_iter()
            .filter(|message| message.id > previous)
            .collect();
        if fresh.is_empty() {
            return Vec::new();
        }
        fresh.sort_by_key(|message| message.id);

        let is_open = *lock(&self.current_channel) == Some(channel.id);
        let callback = lock(&self.on_new_messages).clone();
        if is_open {
            if let Some(callback) = callback {
                callback(channel.id, fresh.iter().map(|message| message.id).collect()).await;
            }
        }

        let mut notifications = Vec::new();
        for message in fresh.iter().filter(|message| message.sender != viewer) {
            let sender = self.session.users.resolve(message.sender).await;
            notifications.push(Notification {
                id: Uuid::new_v4(),
                channel_id: channel.id,
                channel_name: channel.name.clone(),
                message_id: message.id,
                sender_id: message.sender,
                sender_name: sender.name,
                sender_image: sender.image,
                preview: message.preview(),
                sent_at: message.sent_at,
            });
        }
        notifications
    }
}

struct Banner {
    notification: Notification,
    expires_at: Instant,
}

/// Visible notification banners. Each disappears after its time to live or
/// when closed.
pub struct BannerBoard {
    ttl: Duration,
    banners: Mutex<Vec<Banner>>,
}

impl BannerBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            banners: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, notification: Notification) {
        lock(&self.banners).push(Banner {
            notification,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Returns false if the banner was already gone.
    pub fn close(&self, id: Uuid) -> bool {
        let mut banners = lock(&self.banners);
        let before = banners.len();
        banners.retain(|banner| banner.notification.id != id);
        banners.len() != before
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible_at(Instant::now())
    }

    /// Drops expired banners and returns the rest, oldest first.
    pub fn visible_at(&self, now: Instant) -> Vec<Notification> {
        let mut banners = lock(&self.banners);
        banners.retain(|banner| banner.expires_at > now);
        banners
            .iter()
            .map(|banner| banner.notification.clone())
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.banners).clear();
    }
}

impl Default for BannerBoard {
    fn default() -> Self {
        Self::new(BANNER_TTL)
    }
}
