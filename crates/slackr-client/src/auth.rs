use std::sync::Arc;

use slackr_db::Database;
use slackr_types::models::UserId;

use crate::error::Result;

const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "user_id";
const NAME_KEY: &str = "name";

/// Persists the session (token, user id, display name) across restarts.
#[derive(Clone)]
pub struct AuthStore {
    db: Arc<Database>,
}

impl AuthStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn save(&self, token: &str, user_id: UserId) -> Result<()> {
        self.db.session_set(TOKEN_KEY, token)?;
        self.db.session_set(USER_ID_KEY, &user_id.to_string())?;
        Ok(())
    }

    pub fn save_name(&self, name: &str) -> Result<()> {
        self.db.session_set(NAME_KEY, name)?;
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.db.session_get(TOKEN_KEY)?)
    }

    /// A stored id that does not parse counts as logged out.
    pub fn user_id(&self) -> Result<Option<UserId>> {
        Ok(self
            .db
            .session_get(USER_ID_KEY)?
            .and_then(|raw| raw.parse().ok()))
    }

    pub fn name(&self) -> Result<Option<String>> {
        Ok(self.db.session_get(NAME_KEY)?)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.token()?.is_some() && self.user_id()?.is_some())
    }

    pub fn clear(&self) -> Result<()> {
        self.db.session_remove(&[TOKEN_KEY, USER_ID_KEY, NAME_KEY])?;
        Ok(())
    }
}
