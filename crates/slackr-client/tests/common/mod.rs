#![allow(dead_code)]

use std::sync::Arc;

use slackr_api::ApiClient;
use slackr_client::Session;
use slackr_db::Database;
use slackr_mock::MockBackend;
use slackr_types::models::UserId;

pub struct Harness {
    pub backend: MockBackend,
    pub session: Arc<Session>,
    pub me: UserId,
}

/// Mock backend plus a session logged in as `me@example.com`.
pub async fn harness() -> Harness {
    let backend = MockBackend::spawn().await.unwrap();
    let session = logged_out_session(&backend);
    let (me, token) = backend.seed_user("me@example.com", "pw", "Me");
    session.begin(&token, me).unwrap();
    Harness {
        backend,
        session,
        me,
    }
}

pub fn logged_out_session(backend: &MockBackend) -> Arc<Session> {
    Session::new(
        ApiClient::new(&backend.url()),
        Arc::new(Database::open_in_memory().unwrap()),
    )
    .unwrap()
}
