//! Google sign-in flow and the authentication gate.

use axum::http::StatusCode;

use golinks_core::{Clock, FixedClock};
use golinks_integration_tests::{
    FakeProvider, KNOWN_USER_ID, TestContext, body_string, location, session_cookie,
};
use golinks_server::db::{MemoryDatastore, UserSessionRepository};

#[tokio::test]
async fn test_oauth_redirects_to_provider_with_state() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/oauth", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(session_cookie(response.headers()).is_some());
    let location = location(&response);
    assert!(location.starts_with("https://accounts.example.test/"));
    assert!(location.contains("oauth%2Fcallback"));
}

#[tokio::test]
async fn test_sign_in_known_user() {
    let ctx = TestContext::new().await;

    let cookie = ctx.sign_in().await;

    let sessions = UserSessionRepository::new(ctx.store.as_ref())
        .list()
        .await
        .unwrap_or_default();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].1.user_id.as_str(), KNOWN_USER_ID);
    assert_eq!(sessions[0].1.created_at, FixedClock::default().now());

    let response = ctx.get("/links.html", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains(KNOWN_USER_ID));
}

#[tokio::test]
async fn test_sign_in_unknown_user_is_forbidden() {
    let ctx = TestContext::build(
        std::sync::Arc::new(MemoryDatastore::new()),
        FakeProvider::returning("1337"),
    );
    ctx.provision(KNOWN_USER_ID).await;
    let (cookie, state) = ctx.begin_login().await;

    let response = ctx
        .get(
            &format!("/oauth/callback?code=test-code&state={state}"),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let count = UserSessionRepository::new(ctx.store.as_ref()).count().await;
    assert_eq!(count.ok(), Some(0));

    let response = ctx.get("/links.html", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_callback_state_mismatch() {
    let ctx = TestContext::new().await;
    let (cookie, _state) = ctx.begin_login().await;

    let response = ctx
        .get("/oauth/callback?code=test-code&state=forged", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.provider.exchanges(), 0);
}

#[tokio::test]
async fn test_callback_state_is_single_use() {
    let ctx = TestContext::new().await;
    let (cookie, state) = ctx.begin_login().await;
    let callback = format!("/oauth/callback?code=test-code&state={state}");

    let first = ctx.get(&callback, Some(&cookie)).await;
    assert_eq!(first.status(), StatusCode::TEMPORARY_REDIRECT);
    let cookie = session_cookie(first.headers()).unwrap_or(cookie);

    let replay = ctx.get(&callback, Some(&cookie)).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_without_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .get("/oauth/callback?code=test-code&state=anything", None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_missing_code() {
    let ctx = TestContext::new().await;
    let (cookie, state) = ctx.begin_login().await;

    let response = ctx
        .get(&format!("/oauth/callback?state={state}"), Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_provider_failure() {
    let ctx = TestContext::new().await;
    ctx.provider.fail_exchanges();
    let (cookie, state) = ctx.begin_login().await;

    let response = ctx
        .get(
            &format!("/oauth/callback?code=test-code&state={state}"),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let count = UserSessionRepository::new(ctx.store.as_ref()).count().await;
    assert_eq!(count.ok(), Some(0));
}

#[tokio::test]
async fn test_callback_provider_denied() {
    let ctx = TestContext::new().await;
    let (cookie, _state) = ctx.begin_login().await;

    let response = ctx
        .get("/oauth/callback?error=access_denied", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login.html?error=denied");
    assert_eq!(ctx.provider.exchanges(), 0);
}

#[tokio::test]
async fn test_gate_redirects_anonymous_visitors() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/links.html", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login.html");

    let response = ctx
        .post_form("/links", "id=foo&location=http%3A%2F%2Fexample.com", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login.html");
}

#[tokio::test]
async fn test_gate_rejects_tampered_cookie() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;
    let tampered = format!("{cookie}x");

    let response = ctx.get("/links.html", Some(&tampered)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_login_page() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/login.html", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("href=\"/oauth\""));

    let response = ctx.get("/login.html?error=denied", None).await;
    assert!(body_string(response).await.contains("Sign-in was cancelled."));

    let response = ctx
        .get("/login.html?error=%3Cscript%3Ealert(1)%3C%2Fscript%3E", None)
        .await;
    assert!(!body_string(response).await.contains("<script>"));
}
