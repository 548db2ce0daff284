//! Headless Slackr client.
//!
//! Feature modules own all client state and produce render-ready views; a
//! front-end only forwards user input and draws what they return. Every
//! feature shares one [`Session`].

pub mod auth;
pub mod channels;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod format;
pub mod messages;
pub mod offline;
pub mod page;
pub mod router;
pub mod session;
pub mod users;

use std::sync::{Mutex, MutexGuard};

pub use dashboard::{Dashboard, Navigation, Selection};
pub use error::{ClientError, Result};
pub use events::EventBus;
pub use session::Session;

/// Locks feature state, recovering from poisoning.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
