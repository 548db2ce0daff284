//! Typed client for the Slackr REST backend.
//!
//! Endpoints are grouped by resource, one module each, all implemented as
//! methods on [`ApiClient`].

pub mod auth;
pub mod channels;
pub mod client;
pub mod error;
pub mod messages;
pub mod reactions;
pub mod users;

pub use client::ApiClient;
pub use error::{ApiError, Result};
