use std::sync::MutexGuard;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use slackr_types::api::{
    CreateChannelRequest, InviteRequest, LoginRequest, MessageBody, ReactRequest, RegisterRequest,
    UpdateChannelRequest, UpdateProfileRequest,
};
use slackr_types::models::{ChannelId, MessageId, UserId};

use crate::SharedStore;
use crate::state::{Rejection, Store};

type Reply = Result<Json<Value>, Rejection>;

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub(crate) fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/channel", get(list_channels).post(create_channel))
        .route("/channel/{channel_id}", get(channel_details).put(update_channel))
        .route("/channel/{channel_id}/join", post(join_channel))
        .route("/channel/{channel_id}/leave", post(leave_channel))
        .route("/channel/{channel_id}/invite", post(invite))
        .route("/user", get(list_users).put(update_profile))
        .route("/user/{user_id}", get(user_details))
        .route("/message/{channel_id}", get(list_messages).post(send_message))
        .route(
            "/message/{channel_id}/{message_id}",
            put(edit_message).delete(delete_message),
        )
        .route("/message/pin/{channel_id}/{message_id}", post(pin))
        .route("/message/unpin/{channel_id}/{message_id}", post(unpin))
        .route("/message/react/{channel_id}/{message_id}", post(react))
        .route("/message/unreact/{channel_id}/{message_id}", post(unreact))
        .layer(middleware::from_fn_with_state(store.clone(), count_requests))
        .with_state(store)
}

async fn count_requests(State(store): State<SharedStore>, req: Request, next: Next) -> Response {
    lock(&store).requests += 1;
    next.run(req).await
}

fn lock(store: &SharedStore) -> MutexGuard<'_, Store> {
    match store.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn empty() -> Reply {
    Ok(Json(json!({})))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// -- Auth --

async fn register(State(store): State<SharedStore>, Json(req): Json<RegisterRequest>) -> Reply {
    let (token, user_id) = lock(&store).register(&req.email, &req.password, &req.name)?;
    Ok(Json(json!({ "token": token, "userId": user_id })))
}

async fn login(State(store): State<SharedStore>, Json(req): Json<LoginRequest>) -> Reply {
    let (token, user_id) = lock(&store).login(&req.email, &req.password)?;
    Ok(Json(json!({ "token": token, "userId": user_id })))
}

async fn logout(State(store): State<SharedStore>, headers: HeaderMap) -> Reply {
    let mut store = lock(&store);
    store.authenticate(bearer(&headers))?;
    if let Some(token) = bearer(&headers) {
        store.logout(token);
    }
    empty()
}

// -- Channels --

async fn list_channels(State(store): State<SharedStore>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    store.authenticate(bearer(&headers))?;
    Ok(Json(json!({ "channels": store.summaries() })))
}

async fn create_channel(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Json(req): Json<CreateChannelRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    if req.name.trim().is_empty() {
        return Err(Rejection::bad_request("Invalid name"));
    }
    let channel_id = store.create_channel(user_id, &req.name, &req.description, req.private);
    Ok(Json(json!({ "channelId": channel_id })))
}

async fn channel_details(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
) -> Reply {
    let store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    let channel = &store.member_channel(channel_id, user_id)?.info;
    Ok(Json(json!({
        "name": channel.name,
        "creator": channel.creator,
        "description": channel.description,
        "private": channel.private,
        "createdAt": channel.created_at,
        "members": channel.members,
    })))
}

async fn update_channel(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
    Json(req): Json<UpdateChannelRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.update_channel(channel_id, user_id, &req.name, &req.description)?;
    empty()
}

async fn join_channel(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.join(channel_id, user_id)?;
    empty()
}

async fn leave_channel(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.leave(channel_id, user_id)?;
    empty()
}

async fn invite(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
    Json(req): Json<InviteRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.invite(channel_id, user_id, req.user_id)?;
    empty()
}

// -- Users --

async fn list_users(State(store): State<SharedStore>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    store.authenticate(bearer(&headers))?;
    Ok(Json(json!({ "users": store.user_summaries() })))
}

async fn user_details(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
) -> Reply {
    let store = lock(&store);
    store.authenticate(bearer(&headers))?;
    let user = store.user(user_id)?;
    Ok(Json(json!({
        "email": user.email,
        "name": user.name,
        "bio": user.bio,
        "image": user.image,
    })))
}

async fn update_profile(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Json(req): Json<UpdateProfileRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.update_profile(user_id, req)?;
    empty()
}

// -- Messages --

#[derive(Debug, Deserialize)]
struct StartQuery {
    #[serde(default)]
    start: usize,
}

async fn list_messages(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
    Query(query): Query<StartQuery>,
) -> Reply {
    let store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    let messages = store.message_page(channel_id, user_id, query.start)?;
    Ok(Json(json!({ "messages": messages })))
}

async fn send_message(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path(channel_id): Path<ChannelId>,
    Json(body): Json<MessageBody>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.post_message(
        channel_id,
        user_id,
        non_blank(body.message),
        non_blank(body.image),
    )?;
    empty()
}

async fn edit_message(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
    Json(body): Json<MessageBody>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.edit_message(
        channel_id,
        user_id,
        message_id,
        non_blank(body.message),
        non_blank(body.image),
    )?;
    empty()
}

async fn delete_message(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.delete_message(channel_id, user_id, message_id)?;
    empty()
}

async fn pin(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.set_pinned(channel_id, user_id, message_id, true)?;
    empty()
}

async fn unpin(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.set_pinned(channel_id, user_id, message_id, false)?;
    empty()
}

async fn react(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
    Json(req): Json<ReactRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.set_react(channel_id, user_id, message_id, &req.react, true)?;
    empty()
}

async fn unreact(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(ChannelId, MessageId)>,
    Json(req): Json<ReactRequest>,
) -> Reply {
    let mut store = lock(&store);
    let user_id = store.authenticate(bearer(&headers))?;
    store.set_react(channel_id, user_id, message_id, &req.react, false)?;
    empty()
}
