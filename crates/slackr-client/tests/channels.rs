mod common;

use slackr_client::channels::{ChannelAction, ChannelActions, ChannelDetails, ChannelList};
use slackr_client::users::{ProfileUpdate, UserManager};

use common::harness;

#[tokio::test]
async fn private_channels_hidden_from_outsiders() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    h.backend.seed_channel(bob, "secret", true);
    let open = h.backend.seed_channel(bob, "lobby", false);
    let mine = h.backend.seed_channel(h.me, "mine", true);

    let list = ChannelList::new(h.session.clone());
    list.load().await.unwrap();
    list.set_active(Some(open));

    let entries = list.render().unwrap();
    let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["lobby", "mine"]);
    assert!(entries.iter().any(|entry| entry.id == open && entry.active && !entry.member));
    assert!(entries.iter().any(|entry| entry.id == mine && entry.private && entry.member));
}

#[tokio::test]
async fn create_join_leave_round_trip() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    let lobby = h.backend.seed_channel(bob, "lobby", false);
    let actions = ChannelActions::new(h.session.clone());

    let err = actions.create("  ", "", false).await.unwrap_err();
    assert_eq!(err.to_string(), "Channel name is required");

    let created = actions.create(" team ", "our space", true).await.unwrap();
    let channel = h.backend.channel(created).unwrap();
    assert_eq!(channel.name, "team");
    assert!(channel.private);

    actions.join(lobby).await.unwrap();
    assert!(h.backend.channel(lobby).unwrap().members.contains(&h.me));
    actions.leave(lobby).await.unwrap();
    assert!(!h.backend.channel(lobby).unwrap().members.contains(&h.me));
}

#[tokio::test]
async fn details_view_describes_channel() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    let channel = h.backend.seed_channel(bob, "lobby", false);
    h.backend.add_member(channel, h.me);

    let details = ChannelDetails::new(h.session.clone());
    let fetched = details.fetch(channel).await.unwrap();
    assert_eq!(fetched.value.id, channel);

    let view = details.view(&fetched.value).await.unwrap();
    assert_eq!(view.name, "lobby");
    assert_eq!(view.description, "No description");
    assert_eq!(view.visibility, "Public");
    assert_eq!(view.creator_name, "Bob");
    assert_eq!(view.member_count, 2);
    assert!(view.actions.contains(&ChannelAction::Leave));
    assert!(!view.actions.contains(&ChannelAction::Join));
}

#[tokio::test]
async fn offline_channel_writes_are_refused() {
    let h = harness().await;
    h.session.offline.set_online(false);

    let actions = ChannelActions::new(h.session.clone());
    let err = actions.create("team", "", false).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot create channels while offline");
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn cached_channel_list_survives_going_offline() {
    let h = harness().await;
    h.backend.seed_channel(h.me, "general", false);

    let list = ChannelList::new(h.session.clone());
    assert!(!list.load().await.unwrap().is_cached());

    h.session.offline.set_online(false);
    let fetched = list.load().await.unwrap();
    assert!(fetched.is_cached());
    assert_eq!(fetched.value.len(), 1);
}

#[tokio::test]
async fn invite_candidates_exclude_members() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    let (cat, _) = h.backend.seed_user("cat@example.com", "pw", "Cat");
    let channel = h.backend.seed_channel(h.me, "team", true);
    h.backend.add_member(channel, bob);

    let users = UserManager::new(h.session.clone());
    let candidates = users.invite_candidates(channel).await.unwrap();
    let ids: Vec<_> = candidates.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![cat]);

    users.invite(channel, cat).await.unwrap();
    assert!(users.invite_candidates(channel).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_update_refreshes_cached_name() {
    let h = harness().await;
    let users = UserManager::new(h.session.clone());

    let before = users.profile(None).await.unwrap();
    assert_eq!(before.name, "Me");
    assert!(before.own);

    let err = users
        .update_profile(ProfileUpdate {
            email: "me@example.com".into(),
            name: " ".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email and name are required");

    users
        .update_profile(ProfileUpdate {
            email: "me@example.com".into(),
            name: "Renamed".into(),
            bio: Some("hello".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let after = users.profile(None).await.unwrap();
    assert_eq!(after.name, "Renamed");
    assert_eq!(after.initial, 'R');
    assert_eq!(h.session.auth.name().unwrap().as_deref(), Some("Renamed"));
}
