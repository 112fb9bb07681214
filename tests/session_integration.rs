mod common;

use pretty_assertions::assert_eq;

use common::{credentials, session, FakeApi, MemorySessionStore};
use skytui::infrastructure::{api::ApiError, session::sign_in};

#[tokio::test]
async fn test_stored_session_is_resumed() {
    let api = FakeApi::default();
    let store = MemorySessionStore::with(session("alice"));

    let signed_in = sign_in(&api, &store, Some(&credentials()))
        .await
        .expect("signed in");

    assert_eq!(signed_in.handle, "alice.test");
    assert_eq!(api.calls(), vec!["resume alice.test"]);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn test_rejected_session_falls_back_to_password() {
    let api = FakeApi::default();
    *api.resume.lock().expect("lock") = Some(Err(ApiError::Auth(String::from("expired"))));
    *api.authenticate.lock().expect("lock") = Some(Ok(session("carol")));
    let store = MemorySessionStore::with(session("alice"));

    let signed_in = sign_in(&api, &store, Some(&credentials()))
        .await
        .expect("signed in");

    assert_eq!(signed_in.handle, "carol.test");
    assert_eq!(
        api.calls(),
        vec!["resume alice.test", "authenticate alice.test"]
    );
    assert_eq!(store.stored_handle().as_deref(), Some("carol.test"));
}

#[tokio::test]
async fn test_nothing_to_sign_in_with() {
    let api = FakeApi::default();
    let store = MemorySessionStore::default();

    let error = sign_in(&api, &store, None).await.expect_err("no session");

    assert!(error.to_string().contains("identifier"));
    assert!(api.calls().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_wrong_password_is_reported() {
    let api = FakeApi::default();
    *api.authenticate.lock().expect("lock") =
        Some(Err(ApiError::Auth(String::from("Invalid identifier or password"))));
    let store = MemorySessionStore::default();

    let error = sign_in(&api, &store, Some(&credentials()))
        .await
        .expect_err("rejected");

    let report = format!("{error:#}");
    assert!(report.contains("signing in as alice.test"));
    assert!(report.contains("Invalid identifier or password"));
    assert_eq!(store.save_count(), 0);
}
