//! In-memory stand-in for the Slackr backend.
//!
//! Serves the same JSON contract on a random local port so client code can be
//! exercised end to end without a real server. Every request is counted.

mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::info;

use slackr_types::models::{Channel, ChannelId, Message, MessageId, UserId};

use state::Store;

type SharedStore = Arc<Mutex<Store>>;

pub struct MockBackend {
    addr: SocketAddr,
    store: SharedStore,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Binds `127.0.0.1:0` and serves until dropped.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::bind("127.0.0.1:0".parse()?).await
    }

    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let store: SharedStore = Arc::new(Mutex::new(Store::default()));
        let app = routes::router(store.clone());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("Mock backend listening on {}", addr);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock backend stopped: {}", e);
            }
        });

        Ok(Self { addr, store, server })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Waits until the server task ends (it only ends on error).
    pub async fn wait(mut self) {
        let _ = (&mut self.server).await;
    }

    /// Total HTTP requests served so far.
    pub fn request_count(&self) -> usize {
        self.with_store(|store| store.requests)
    }

    pub fn seed_user(&self, email: &str, password: &str, name: &str) -> (UserId, String) {
        self.with_store(|store| {
            let user_id = store.create_user(email, password, name);
            let token = store.issue_token(user_id);
            (user_id, token)
        })
    }

    pub fn seed_channel(&self, creator: UserId, name: &str, private: bool) -> ChannelId {
        self.with_store(|store| store.create_channel(creator, name, "", private))
    }

    pub fn add_member(&self, channel_id: ChannelId, user_id: UserId) {
        self.with_store(|store| {
            if let Some(channel) = store.channels.get_mut(&channel_id) {
                if !channel.info.members.contains(&user_id) {
                    channel.info.members.push(user_id);
                }
            }
        })
    }

    /// Removes a member without going through the API, e.g. a creator who
    /// left their own channel.
    pub fn remove_member(&self, channel_id: ChannelId, user_id: UserId) {
        self.with_store(|store| {
            if let Some(channel) = store.channels.get_mut(&channel_id) {
                channel.info.members.retain(|member| *member != user_id);
            }
        })
    }

    pub fn seed_message(&self, channel_id: ChannelId, sender: UserId, text: &str) -> MessageId {
        self.with_store(|store| {
            store
                .post_message(channel_id, sender, Some(text.to_string()), None)
                .unwrap_or_default()
        })
    }

    pub fn seed_image_message(&self, channel_id: ChannelId, sender: UserId, image: &str) -> MessageId {
        self.with_store(|store| {
            store
                .post_message(channel_id, sender, None, Some(image.to_string()))
                .unwrap_or_default()
        })
    }

    /// Makes `GET /message/{channel_id}` answer 500 until cleared.
    pub fn fail_messages_for(&self, channel_id: ChannelId, failing: bool) {
        self.with_store(|store| {
            if failing {
                store.failing_channels.insert(channel_id);
            } else {
                store.failing_channels.remove(&channel_id);
            }
        })
    }

    /// Oldest first.
    pub fn messages(&self, channel_id: ChannelId) -> Vec<Message> {
        self.with_store(|store| {
            store
                .channels
                .get(&channel_id)
                .map(|channel| channel.messages.clone())
                .unwrap_or_default()
        })
    }

    pub fn channel(&self, channel_id: ChannelId) -> Option<Channel> {
        self.with_store(|store| store.channels.get(&channel_id).map(|c| c.info.clone()))
    }

    fn with_store<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Store) -> T,
    {
        let mut store = match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut store)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
