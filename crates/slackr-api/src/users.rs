use slackr_types::api::{UpdateProfileRequest, UsersResponse};
use slackr_types::models::{User, UserId, UserSummary};

use crate::client::{ApiClient, Empty};
use crate::error::Result;

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let resp: UsersResponse = self.get("/user").await?;
        Ok(resp.users)
    }

    /// `GET /user/{id}`; the id is filled in from the request path.
    pub async fn user_details(&self, user_id: UserId) -> Result<User> {
        let mut user: User = self.get(&format!("/user/{}", user_id)).await?;
        user.id = user_id;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<()> {
        let _: Empty = self.put("/user", update).await?;
        Ok(())
    }
}
