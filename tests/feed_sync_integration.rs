mod common;

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;

use common::{code, credentials, key, page, post, FakeApi, Harness};
use skytui::{
    core::message::{AppMsg, SystemMsg},
    infrastructure::api::ApiError,
    model::feed_sync::SyncState,
};

fn tick() -> AppMsg {
    AppMsg::System(SystemMsg::Tick)
}

#[tokio::test]
async fn test_new_posts_keep_the_selected_post() {
    let api = FakeApi::default();
    api.push_feed(Ok(page(vec![post("p2", 20), post("p1", 10)], Some("c1"))));
    let mut harness = Harness::new(api);
    harness.start().await;
    assert_eq!(harness.selected_text().as_deref(), Some("post p2"));

    harness.press(key('j')).await;
    assert_eq!(harness.selected_text().as_deref(), Some("post p1"));

    harness
        .api
        .push_feed(Ok(page(vec![post("p3", 30), post("p2", 20)], Some("c-new"))));
    harness.send(tick()).await;

    let state = &harness.state;
    assert_eq!(state.store.feed_len(), 3);
    assert_eq!(state.nav.feed().selection.selected_index(), Some(2));
    assert_eq!(harness.selected_text().as_deref(), Some("post p1"));
    // The head page never moves the cursor for older posts
    assert_eq!(
        state.sync.older_cursor().map(|cursor| cursor.as_str()),
        Some("c1")
    );
    assert_eq!(harness.api.calls(), vec!["feed -", "feed -"]);
}

#[tokio::test]
async fn test_older_pages_until_exhausted() {
    let api = FakeApi::default();
    api.push_feed(Ok(page(vec![post("p3", 30), post("p2", 20)], Some("c1"))));
    api.push_feed(Ok(page(vec![post("p1", 10)], Some("c2"))));
    api.push_feed(Ok(page(vec![post("p0", 5)], None)));
    let mut harness = Harness::new(api);
    harness.start().await;

    harness.press(key('G')).await;
    assert_eq!(harness.state.store.feed_len(), 3);
    assert_eq!(harness.selected_text().as_deref(), Some("post p2"));

    // Moving past the last post asks for the next page
    harness.press(key('j')).await;
    harness.press(key('j')).await;
    assert_eq!(harness.state.store.feed_len(), 4);
    assert!(harness.state.sync.is_exhausted());

    harness.press(key('G')).await;
    harness.press(key('j')).await;

    assert_eq!(harness.selected_text().as_deref(), Some("post p0"));
    assert_eq!(
        harness.api.calls(),
        vec!["feed -", "feed c1", "feed c2"]
    );
}

#[tokio::test]
async fn test_transient_failure_retries_on_next_tick() {
    let api = FakeApi::default();
    api.push_feed(Err(ApiError::Network(String::from("connection reset"))));
    let mut harness = Harness::new(api);
    harness.start().await;

    assert!(matches!(
        harness.state.sync.state(),
        SyncState::Failed { attempts: 1, .. }
    ));

    harness.api.push_feed(Ok(page(vec![post("p1", 10)], None)));
    harness.send(tick()).await;

    assert_eq!(*harness.state.sync.state(), SyncState::Idle);
    assert_eq!(harness.state.store.feed_len(), 1);
}

#[tokio::test]
async fn test_expired_session_signs_in_again_and_resumes() {
    let api = FakeApi::default();
    api.push_feed(Err(ApiError::Auth(String::from("ExpiredToken"))));
    let mut harness = Harness::with_credentials(api, Some(credentials()));
    harness.start().await;

    assert_eq!(*harness.state.sync.state(), SyncState::Idle);
    assert_eq!(
        harness.sessions.stored_handle().as_deref(),
        Some("alice.test")
    );
    assert_eq!(harness.sessions.save_count(), 1);
    assert_eq!(
        harness.api.calls(),
        vec!["feed -", "authenticate alice.test"]
    );

    harness.api.push_feed(Ok(page(vec![post("p1", 10)], None)));
    harness.send(tick()).await;

    assert_eq!(harness.state.store.feed_len(), 1);
}

#[tokio::test]
async fn test_expired_session_without_password_stays_halted() {
    let api = FakeApi::default();
    api.push_feed(Err(ApiError::Auth(String::from("ExpiredToken"))));
    let mut harness = Harness::new(api);
    harness.start().await;

    assert!(harness.state.sync.is_halted());

    harness.send(tick()).await;
    harness.press(code(KeyCode::Down)).await;

    assert!(harness.state.sync.is_halted());
    assert_eq!(harness.sessions.save_count(), 0);
    assert_eq!(harness.api.calls(), vec!["feed -"]);
    assert!(harness.state.status_bar.notice().is_some());
}
