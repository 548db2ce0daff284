//! Connectivity flag and read-through snapshot cache.
//!
//! Reads of the channel list, channel details, message pages and user
//! details go through
//! [`OfflineManager::read_through`]. Writes call
//! [`OfflineManager::ensure_online`] first and are refused while offline.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use slackr_db::Database;
use slackr_types::events::ClientEvent;
use slackr_types::models::{ChannelId, UserId};

use crate::error::{ClientError, Result};
use crate::events::EventBus;

pub const CHANNELS_KEY: &str = "channels";

pub fn channel_key(channel_id: ChannelId) -> String {
    format!("channel:{}", channel_id)
}

pub fn messages_key(channel_id: ChannelId) -> String {
    format!("messages:{}", channel_id)
}

pub fn user_key(user_id: UserId) -> String {
    format!("user:{}", user_id)
}

/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache { cached_at: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, Source::Cache { .. })
    }
}

pub struct OfflineManager {
    db: Arc<Database>,
    online: AtomicBool,
    events: EventBus,
}

impl OfflineManager {
    pub fn new(db: Arc<Database>, events: EventBus) -> Self {
        Self {
            db,
            online: AtomicBool::new(true),
            events,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Publishes `OnlineStatusChanged` only when the flag actually flips.
    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            info!("Connectivity changed: {}", if online { "online" } else { "offline" });
            self.events
                .publish(ClientEvent::OnlineStatusChanged { online });
        }
    }

    /// Fails with `Cannot <action> while offline` when offline.
    pub fn ensure_online(&self, action: &'static str) -> Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(ClientError::Offline(action))
        }
    }

    /// Offline: answer from cache without touching the network.
    /// Online: fetch and refresh the cache, or fall back to cache on failure.
    pub async fn read_through<T, F, Fut>(&self, key: &str, what: &str, fetch: F) -> Result<Fetched<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = slackr_api::Result<T>>,
    {
        if !self.is_online() {
            return self
                .cached(key)
                .ok_or_else(|| ClientError::Unavailable(format!("No cached {} available offline", what)));
        }

        match fetch().await {
            Ok(value) => {
                if let Err(e) = self.store(key, &value) {
                    warn!("Failed to cache {}: {}", key, e);
                }
                Ok(Fetched {
                    value,
                    source: Source::Network,
                })
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", key, e);
                match self.cached(key) {
                    Some(fetched) => Ok(fetched),
                    None => Err(e.into()),
                }
            }
        }
    }

    pub fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value).map_err(anyhow::Error::from)?;
        self.db.cache_put(key, &payload, Utc::now())?;
        Ok(())
    }

    /// Unreadable or corrupt entries count as missing.
    pub fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<Fetched<T>> {
        let row = match self.db.cache_get(key) {
            Ok(row) => row?,
            Err(e) => {
                warn!("Cache read for {} failed: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&row.payload) {
            Ok(value) => Some(Fetched {
                value,
                source: Source::Cache {
                    cached_at: row.cached_at,
                },
            }),
            Err(e) => {
                warn!("Discarding corrupt cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub fn last_updated(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.db.cache_last_updated()?)
    }

    pub fn clear(&self) -> Result<()> {
        let removed = self.db.cache_clear()?;
        info!("Cleared {} cached snapshots", removed);
        Ok(())
    }
}
