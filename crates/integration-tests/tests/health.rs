//! Health checks and storage failures.

use std::sync::Arc;

use axum::http::StatusCode;

use golinks_integration_tests::{
    FakeProvider, KNOWN_USER_ID, TestContext, UnavailableDatastore, body_string,
};

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.get("/health/ready", None).await.status(),
        StatusCode::OK
    );

    let down = TestContext::build(
        Arc::new(UnavailableDatastore),
        FakeProvider::returning(KNOWN_USER_ID),
    );
    assert_eq!(
        down.get("/health/ready", None).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let ctx = TestContext::build(
        Arc::new(UnavailableDatastore),
        FakeProvider::returning(KNOWN_USER_ID),
    );

    let response = ctx.get("/foo", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal server error");
}

#[tokio::test]
async fn test_root_does_not_touch_storage() {
    let ctx = TestContext::build(
        Arc::new(UnavailableDatastore),
        FakeProvider::returning(KNOWN_USER_ID),
    );

    let response = ctx.get("/", None).await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_sign_in_with_storage_failure() {
    let ctx = TestContext::build(
        Arc::new(UnavailableDatastore),
        FakeProvider::returning(KNOWN_USER_ID),
    );
    let (cookie, state) = ctx.begin_login().await;

    let response = ctx
        .get(
            &format!("/oauth/callback?code=test-code&state={state}"),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
