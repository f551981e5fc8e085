//! Link registration.

use std::sync::Arc;

use axum::http::StatusCode;

use golinks_integration_tests::{
    FakeProvider, KNOWN_USER_ID, LinkWritesFailDatastore, TestContext, body_string, location,
};
use golinks_server::db::LinkRepository;

async fn link_count(ctx: &TestContext) -> u64 {
    LinkRepository::new(ctx.store.as_ref())
        .count()
        .await
        .unwrap_or(u64::MAX)
}

#[tokio::test]
async fn test_register_returns_no_content() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;

    let response = ctx
        .post_form(
            "/links",
            "id=example&location=http%3A%2F%2Fwww.example.com",
            Some(&cookie),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(link_count(&ctx).await, 1);
}

#[tokio::test]
async fn test_register_from_browser_redirects_to_list() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;

    let response = ctx
        .post_form(
            "/links",
            "id=example&location=http%3A%2F%2Fwww.example.com",
            Some(&cookie),
            Some("text/html,application/xhtml+xml"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/links.html");

    let page = body_string(ctx.get("/links.html", Some(&cookie)).await).await;
    assert!(page.contains("http://www.example.com"));
}

#[tokio::test]
async fn test_reregister_overwrites() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;
    ctx.post_form(
        "/links",
        "id=example&location=http%3A%2F%2Fwww.example.com",
        Some(&cookie),
        None,
    )
    .await;
    let before = link_count(&ctx).await;

    let response = ctx
        .post_form(
            "/links",
            "id=example&location=http%3A%2F%2Fwww.example.org",
            Some(&cookie),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(link_count(&ctx).await, before);
    let response = ctx.get("/example", None).await;
    assert_eq!(location(&response), "http://www.example.org");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;

    for form in [
        "id=&location=http%3A%2F%2Fwww.example.com",
        "id=oauth&location=http%3A%2F%2Fwww.example.com",
        "id=login.html&location=http%3A%2F%2Fwww.example.com",
        "id=foo&location=",
        "id=foo&location=not%20a%20url",
        "id=foo&location=javascript%3Aalert(1)",
        "id=a%2520b&location=http%3A%2F%2Fwww.example.com",
        "id=foo%3Fbar&location=http%3A%2F%2Fwww.example.com",
        "id=foo%23bar&location=http%3A%2F%2Fwww.example.com",
        "id=nl&location=http%3A%2F%2Fexample.com%2Fa%0Ab",
        "id=tab&location=http%3A%2F%2Fexample.com%2F%09a",
    ] {
        let response = ctx.post_form("/links", form, Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
    }

    assert_eq!(link_count(&ctx).await, 0);
}

#[tokio::test]
async fn test_register_invalid_from_browser_rerenders_form() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;

    let response = ctx
        .post_form(
            "/links",
            "id=foo&location=ftp%3A%2F%2Fexample.com",
            Some(&cookie),
            Some("text/html"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_string(response).await;
    assert!(page.contains("class=\"error\""));
    assert!(page.contains("value=\"foo\""));
}

#[tokio::test]
async fn test_links_page_lists_links_in_order() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in().await;
    for form in [
        "id=zeta&location=http%3A%2F%2Fz.example.com",
        "id=alpha&location=http%3A%2F%2Fa.example.com",
    ] {
        ctx.post_form("/links", form, Some(&cookie), None).await;
    }

    let page = body_string(ctx.get("/links.html", Some(&cookie)).await).await;

    let alpha = page.find("http://a.example.com");
    let zeta = page.find("http://z.example.com");
    assert!(alpha.is_some() && zeta.is_some());
    assert!(alpha < zeta);
}

#[tokio::test]
async fn test_register_storage_failure() {
    let ctx = TestContext::build(
        Arc::new(LinkWritesFailDatastore::default()),
        FakeProvider::returning(KNOWN_USER_ID),
    );
    ctx.provision(KNOWN_USER_ID).await;
    let cookie = ctx.sign_in().await;

    let response = ctx
        .post_form(
            "/links",
            "id=example&location=http%3A%2F%2Fwww.example.com",
            Some(&cookie),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(link_count(&ctx).await, 0);
}
