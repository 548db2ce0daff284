use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use slackr_types::models::{ChannelId, UserId};

use crate::lock;

/// Location encoded in the URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Channel(ChannelId),
    OwnProfile,
    Profile(UserId),
}

impl Route {
    /// Accepts the fragment with or without its leading `#`. Anything
    /// unrecognised is `Home`.
    pub fn parse(fragment: &str) -> Route {
        let fragment = fragment.trim().trim_start_matches('#');
        if fragment == "profile" {
            return Route::OwnProfile;
        }
        match fragment.split_once('=') {
            Some(("channel", id)) => id.parse().map(Route::Channel).unwrap_or(Route::Home),
            Some(("profile", id)) => id.parse().map(Route::Profile).unwrap_or(Route::Home),
            _ => Route::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => Ok(()),
            Route::Channel(id) => write!(f, "#channel={}", id),
            Route::OwnProfile => write!(f, "#profile"),
            Route::Profile(id) => write!(f, "#profile={}", id),
        }
    }
}

pub struct Router {
    current: Mutex<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Home),
        }
    }

    pub fn navigate(&self, route: Route) {
        debug!("Route: {:?}", route);
        *lock(&self.current) = route;
    }

    pub fn current(&self) -> Route {
        *lock(&self.current)
    }

    pub fn fragment(&self) -> String {
        self.current().to_string()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
