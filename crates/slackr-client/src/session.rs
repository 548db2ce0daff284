use std::sync::Arc;

use tracing::info;

use slackr_api::ApiClient;
use slackr_db::Database;
use slackr_types::events::ClientEvent;
use slackr_types::models::UserId;

use crate::auth::AuthStore;
use crate::error::{ClientError, Result};
use crate::events::EventBus;
use crate::offline::OfflineManager;
use crate::users::UserDirectory;

/// Collaborators shared by every feature module of one logged-in client.
///
/// Session-scoped caches (the user directory) live here and are dropped by
/// [`Session::end`].
pub struct Session {
    pub api: ApiClient,
    pub auth: AuthStore,
    pub offline: Arc<OfflineManager>,
    pub users: UserDirectory,
    pub events: EventBus,
}

impl Session {
    /// Restores a persisted token into the API client, if there is one.
    pub fn new(api: ApiClient, db: Arc<Database>) -> Result<Arc<Self>> {
        let events = EventBus::new();
        let auth = AuthStore::new(db.clone());
        if let Some(token) = auth.token()? {
            api.set_token(Some(token));
        }

        let offline = Arc::new(OfflineManager::new(db, events.clone()));
        Ok(Arc::new(Self {
            users: UserDirectory::new(api.clone(), offline.clone()),
            offline,
            auth,
            api,
            events,
        }))
    }

    pub fn user_id(&self) -> Result<UserId> {
        self.auth.user_id()?.ok_or(ClientError::NotLoggedIn)
    }

    pub fn begin(&self, token: &str, user_id: UserId) -> Result<()> {
        self.auth.save(token, user_id)?;
        self.api.set_token(Some(token.to_string()));
        info!("Session started for user {}", user_id);
        Ok(())
    }

    /// Drops local credentials, session caches and offline snapshots. Never
    /// fails halfway: every step runs even if an earlier one cannot write.
    pub fn end(&self) -> Result<()> {
        self.api.set_token(None);
        self.users.clear();
        let auth_cleared = self.auth.clear();
        let cache_cleared = self.offline.clear();
        self.events.publish(ClientEvent::SessionEnded);
        info!("Session ended");
        auth_cleared.and(cache_cleared)
    }

    /// Shows `err` in the error popup.
    pub fn report(&self, err: &ClientError) {
        self.events.publish(ClientEvent::ErrorRaised {
            message: err.to_string(),
        });
    }
}
