use reqwest::Method;

use slackr_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::client::{ApiClient, Auth, Empty};
use crate::error::Result;

impl ApiClient {
    /// `POST /auth/register`. Does not store the returned token.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.request(Method::POST, "/auth/register", Some(&body), Auth::Public)
            .await
    }

    /// `POST /auth/login`. Does not store the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.request(Method::POST, "/auth/login", Some(&body), Auth::Public)
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        let _: Empty = self.post("/auth/logout", None::<&()>).await?;
        Ok(())
    }
}
