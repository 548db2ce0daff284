use std::sync::{Arc, RwLock};

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use slackr_types::api::ErrorBody;

use crate::error::{ApiError, Result};

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Public,
    Bearer,
}

/// Response body for endpoints that answer `{}`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Empty {}

/// HTTP client for the Slackr backend.
///
/// Cheap to clone; clones share the connection pool and the session token.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None::<&()>, Auth::Bearer).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        self.request(Method::POST, path, body, Auth::Bearer).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::PUT, path, Some(body), Auth::Bearer).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None::<&()>, Auth::Bearer).await
    }

    /// Sends one JSON request and decodes the JSON answer. Non-2xx answers
    /// become [`ApiError::Api`] carrying the backend's `error` string.
    pub(crate) async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if auth == Auth::Bearer {
            let token = self.token().ok_or(ApiError::MissingToken)?;
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| "Request failed".to_string());
            debug!("{} {} -> {}: {}", method, path, status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = if text.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&text)?
        };
        Ok(serde_json::from_value(value)?)
    }
}
