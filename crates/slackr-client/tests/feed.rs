mod common;

use slackr_client::ClientError;
use slackr_client::messages::renderer::FeedView;
use slackr_client::messages::{LoadMore, MessageFeed};
use slackr_client::offline::messages_key;

use common::harness;

#[tokio::test]
async fn first_page_is_newest_twenty_five_ascending() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    for i in 0..30 {
        h.backend.seed_message(channel, h.me, &format!("m{}", i));
    }

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    let texts: Vec<_> = feed
        .messages()
        .into_iter()
        .filter_map(|message| message.message)
        .collect();
    assert_eq!(texts.len(), 25);
    assert_eq!(texts.first().map(String::as_str), Some("m5"));
    assert_eq!(texts.last().map(String::as_str), Some("m29"));
    assert!(feed.has_more());
}

#[tokio::test]
async fn older_pages_prepend_until_exhausted() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    for i in 0..30 {
        h.backend.seed_message(channel, h.me, &format!("m{}", i));
    }

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    assert_eq!(
        feed.load_more().await.unwrap(),
        LoadMore::Loaded {
            added: 5,
            has_more: false
        }
    );
    let messages = feed.messages();
    assert_eq!(messages.len(), 30);
    assert_eq!(messages[0].message.as_deref(), Some("m0"));
    assert!(messages.windows(2).all(|pair| pair[0].sent_at <= pair[1].sent_at));

    let before = h.backend.request_count();
    assert_eq!(feed.load_more().await.unwrap(), LoadMore::Exhausted);
    assert_eq!(h.backend.request_count(), before);
}

#[tokio::test]
async fn concurrent_scrolls_fetch_one_page() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    for i in 0..60 {
        h.backend.seed_message(channel, h.me, &format!("m{}", i));
    }

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    let before = h.backend.request_count();
    let (first, second) = tokio::join!(feed.load_more(), feed.load_more());
    assert!(matches!(first.unwrap(), LoadMore::Loaded { added: 25, .. }));
    assert_eq!(second.unwrap(), LoadMore::Busy);
    assert_eq!(h.backend.request_count(), before + 1);
    assert!(!feed.is_loading_more());
}

#[tokio::test]
async fn page_from_previous_channel_is_dropped() {
    let h = harness().await;
    let first = h.backend.seed_channel(h.me, "first", false);
    let second = h.backend.seed_channel(h.me, "second", false);
    for i in 0..30 {
        h.backend.seed_message(first, h.me, &format!("old{}", i));
    }
    h.backend.seed_message(second, h.me, "fresh");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(first).await.unwrap();

    let (older, switched) = tokio::join!(feed.load_more(), feed.load_messages(second));
    switched.unwrap();
    assert_eq!(older.unwrap(), LoadMore::Stale);

    assert_eq!(feed.channel(), Some(second));
    let texts: Vec<_> = feed.messages().into_iter().filter_map(|m| m.message).collect();
    assert_eq!(texts, vec!["fresh".to_string()]);
}

#[tokio::test]
async fn send_shows_own_message() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();
    assert_eq!(feed.view().unwrap(), FeedView::Empty);

    feed.send_message("  hello  ", None).await.unwrap();

    let FeedView::Messages(views) = feed.view().unwrap() else {
        panic!("expected messages");
    };
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].text.as_deref(), Some("hello"));
    assert_eq!(views[0].sender_id, h.me);
    assert!(views[0].own);
}

#[tokio::test]
async fn send_requires_text_and_channel() {
    let h = harness().await;
    let feed = MessageFeed::new(h.session.clone());

    let err = feed.send_message("   ", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Message cannot be empty");

    let err = feed.send_message("hi", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Please select a channel first");
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn unchanged_edit_sends_nothing() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    let id = h.backend.seed_message(channel, h.me, "same");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    let before = h.backend.request_count();
    let err = feed.edit_message(id, " same ", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Message content is unchanged");
    assert_eq!(h.backend.request_count(), before);

    feed.edit_message(id, "changed", None).await.unwrap();
    let edited = feed.message(id).unwrap();
    assert_eq!(edited.message.as_deref(), Some("changed"));
    assert!(edited.edited);
}

#[tokio::test]
async fn delete_and_pin_reload_the_feed() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    let keep = h.backend.seed_message(channel, h.me, "keep");
    let gone = h.backend.seed_message(channel, h.me, "drop");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    feed.delete_message(gone).await.unwrap();
    assert!(feed.message(gone).is_none());

    feed.pin_message(keep).await.unwrap();
    let pinned = feed.pinned().unwrap();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].id, keep);

    feed.unpin_message(keep).await.unwrap();
    assert!(feed.pinned().unwrap().is_empty());
}

#[tokio::test]
async fn react_then_unreact_restores_reactions() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    let id = h.backend.seed_message(channel, h.me, "hi");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();
    let original = feed.message(id).unwrap().reacts;

    feed.toggle_reaction_on(id, "👍").await.unwrap();
    let reacted = feed.message(id).unwrap();
    assert!(reacted.has_reacted(h.me, "👍"));

    feed.toggle_reaction_on(id, "👍").await.unwrap();
    assert_eq!(feed.message(id).unwrap().reacts, original);
}

#[tokio::test]
async fn offline_reload_is_served_from_cache() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    h.backend.seed_message(channel, h.me, "cached");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();
    assert!(!feed.is_cached());

    h.session.offline.set_online(false);
    let before = h.backend.request_count();
    feed.load_messages(channel).await.unwrap();

    assert_eq!(h.backend.request_count(), before);
    assert!(feed.is_cached());
    assert_eq!(feed.messages()[0].message.as_deref(), Some("cached"));
}

#[tokio::test]
async fn offline_without_cache_is_unavailable() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);

    h.session.offline.set_online(false);
    let feed = MessageFeed::new(h.session.clone());
    let err = feed.load_messages(channel).await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable(_)));
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn offline_send_is_refused() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    h.backend.seed_message(channel, h.me, "before");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();
    let before = feed.messages();

    h.session.offline.set_online(false);
    let err = feed.send_message("hello", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot send messages while offline");
    assert_eq!(feed.messages(), before);
    assert_eq!(h.backend.messages(channel).len(), 1);

    // A single short page is already exhausted; nothing to refuse.
    assert_eq!(feed.load_more().await.unwrap(), LoadMore::Exhausted);
}

#[tokio::test]
async fn failing_backend_falls_back_to_cache() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    h.backend.seed_message(channel, h.me, "kept");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    h.backend.fail_messages_for(channel, true);
    feed.load_messages(channel).await.unwrap();
    assert!(feed.is_cached());
    assert_eq!(feed.messages().len(), 1);
}

#[tokio::test]
async fn offline_reload_with_cold_user_cache_sends_nothing() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    let channel = h.backend.seed_channel(h.me, "general", false);
    h.backend.add_member(channel, bob);
    h.backend.seed_message(channel, bob, "from bob");
    h.backend.seed_message(channel, h.me, "from me");

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    h.session.users.clear();
    h.session.offline.set_online(false);
    let before = h.backend.request_count();
    feed.load_messages(channel).await.unwrap();
    assert_eq!(h.backend.request_count(), before);

    let FeedView::Messages(views) = feed.view().unwrap() else {
        panic!("expected messages");
    };
    let names: Vec<_> = views.iter().map(|view| view.sender_name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Me"]);
}

#[tokio::test]
async fn offline_senders_never_seen_are_unknown() {
    let h = harness().await;
    let (bob, _) = h.backend.seed_user("bob@example.com", "pw", "Bob");
    let channel = h.backend.seed_channel(h.me, "general", false);
    h.backend.add_member(channel, bob);
    h.backend.seed_message(channel, bob, "hi");
    h.session
        .offline
        .store(&messages_key(channel), &h.backend.messages(channel))
        .unwrap();

    h.session.offline.set_online(false);
    let before = h.backend.request_count();
    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();
    assert_eq!(h.backend.request_count(), before);

    let FeedView::Messages(views) = feed.view().unwrap() else {
        panic!("expected messages");
    };
    assert_eq!(views[0].sender_name, "Unknown User");
}

#[tokio::test]
async fn offline_scroll_back_is_refused_and_releases_guard() {
    let h = harness().await;
    let channel = h.backend.seed_channel(h.me, "general", false);
    for i in 0..30 {
        h.backend.seed_message(channel, h.me, &format!("m{}", i));
    }

    let feed = MessageFeed::new(h.session.clone());
    feed.load_messages(channel).await.unwrap();

    h.session.offline.set_online(false);
    let before = h.backend.request_count();
    let err = feed.load_more().await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable(_)));
    assert_eq!(err.to_string(), "Older messages are not available offline");
    assert_eq!(h.backend.request_count(), before);
    assert!(!feed.is_loading_more());
    assert!(feed.has_more());

    h.session.offline.set_online(true);
    assert_eq!(
        feed.load_more().await.unwrap(),
        LoadMore::Loaded {
            added: 5,
            has_more: false
        }
    );
}
