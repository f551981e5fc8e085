//! Integration test harness for golinks.
//!
//! Drives the real router in-process with `tower::ServiceExt::oneshot`. The
//! datastore, session store, identity provider and clock are in-memory
//! stand-ins, so no database or network is needed.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! let cookie = ctx.sign_in().await;
//! let response = ctx.get("/links.html", Some(&cookie)).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        HeaderMap, Request, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use golinks_core::{Destination, Email, ExternalId, FixedClock, User};
use golinks_server::config::{GolinksConfig, GoogleConfig};
use golinks_server::db::{Datastore, Kind, MemoryDatastore, RepositoryError, UserRepository};
use golinks_server::google::{AccessToken, IdentityProvider, Profile, ProviderError};
use golinks_server::middleware::SESSION_COOKIE_NAME;
use golinks_server::state::AppState;

/// External id of the user provisioned by [`TestContext::new`].
pub const KNOWN_USER_ID: &str = "42";

/// Where `GET /` redirects in tests.
pub const DEFAULT_REDIRECT: &str = "http://www.example.com/default";

/// Public base URL the test server believes it runs under.
pub const BASE_URL: &str = "http://localhost:8080";

/// Identity provider that accepts any code.
pub struct FakeProvider {
    profile_id: String,
    fail: AtomicBool,
    exchanges: AtomicUsize,
}

impl FakeProvider {
    /// Provider whose profile endpoint returns `profile_id`.
    #[must_use]
    pub fn returning(profile_id: &str) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            fail: AtomicBool::new(false),
            exchanges: AtomicUsize::new(0),
        }
    }

    /// Make every token exchange fail from now on.
    pub fn fail_exchanges(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Number of token exchanges attempted.
    #[must_use]
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        let mut url = url::Url::parse("https://accounts.example.test/o/oauth2/auth")
            .unwrap_or_else(|_| unreachable!("static URL"));
        url.query_pairs_mut()
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state);
        url.into()
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<AccessToken, ProviderError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::OAuth("Token exchange failed (500)".to_string()));
        }
        Ok(AccessToken {
            access_token: SecretString::from("test-access-token"),
        })
    }

    async fn fetch_profile(&self, _token: &AccessToken) -> Result<Profile, ProviderError> {
        Ok(Profile {
            id: ExternalId::new(self.profile_id.clone()),
            email: Some("jane@example.com".to_string()),
            verified_email: Some(true),
            picture: None,
        })
    }
}

/// Datastore whose every operation fails.
#[derive(Debug, Default)]
pub struct UnavailableDatastore;

#[async_trait]
impl Datastore for UnavailableDatastore {
    async fn get(&self, _kind: Kind, _key: &str) -> Result<Option<Value>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _kind: Kind, _key: &str, _record: Value) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn all(&self, _kind: Kind) -> Result<Vec<(String, Value)>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn count(&self, _kind: Kind) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

/// In-memory datastore that refuses to write links.
///
/// Users and sign-in records still work, so a visitor can sign in and then
/// hit a storage failure while registering.
#[derive(Debug, Default)]
pub struct LinkWritesFailDatastore {
    inner: MemoryDatastore,
}

#[async_trait]
impl Datastore for LinkWritesFailDatastore {
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Value>, RepositoryError> {
        self.inner.get(kind, key).await
    }

    async fn put(&self, kind: Kind, key: &str, record: Value) -> Result<(), RepositoryError> {
        if kind == Kind::Link {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        self.inner.put(kind, key, record).await
    }

    async fn all(&self, kind: Kind) -> Result<Vec<(String, Value)>, RepositoryError> {
        self.inner.all(kind).await
    }

    async fn count(&self, kind: Kind) -> Result<u64, RepositoryError> {
        self.inner.count(kind).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}

/// Configuration for the in-process server.
#[must_use]
pub fn test_config() -> GolinksConfig {
    GolinksConfig {
        database_url: SecretString::from("postgres://localhost/golinks_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 8080,
        base_url: BASE_URL.to_string(),
        default_redirect: Destination::parse(DEFAULT_REDIRECT)
            .unwrap_or_else(|e| unreachable!("static destination: {e}")),
        session_secret: SecretString::from(
            "Kx9mPq2vLw8nRt5yBc3hJf7gDs4aZe6uXo1iMk0pNb9vQr2wTy5eUi8oPl3kJh6g",
        ),
        session_secret_generated: false,
        google: GoogleConfig::new(
            "test.apps.googleusercontent.com".to_string(),
            SecretString::from("test-secret"),
        ),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// An in-process server plus handles on its collaborators.
pub struct TestContext {
    pub app: Router,
    pub store: Arc<dyn Datastore>,
    pub provider: Arc<FakeProvider>,
    pub clock: FixedClock,
}

impl TestContext {
    /// Server with one provisioned user, [`KNOWN_USER_ID`], whom the fake
    /// provider signs in.
    pub async fn new() -> Self {
        let ctx = Self::build(
            Arc::new(MemoryDatastore::new()),
            FakeProvider::returning(KNOWN_USER_ID),
        );
        ctx.provision(KNOWN_USER_ID).await;
        ctx
    }

    /// Server over the given collaborators, with no users.
    #[must_use]
    pub fn build(store: Arc<dyn Datastore>, provider: FakeProvider) -> Self {
        let provider = Arc::new(provider);
        let clock = FixedClock::default();
        let state = AppState::new(
            test_config(),
            Arc::clone(&store),
            Arc::clone(&provider) as Arc<dyn IdentityProvider>,
            Arc::new(clock),
        );
        let app = golinks_server::app(state, MemoryStore::default())
            .unwrap_or_else(|e| unreachable!("test session key is valid: {e}"));

        Self {
            app,
            store,
            provider,
            clock,
        }
    }

    /// Add a user to the store.
    pub async fn provision(&self, id: &str) {
        let user = User {
            id: ExternalId::new(id),
            email: Email::parse("jane@example.com")
                .unwrap_or_else(|e| unreachable!("static email: {e}")),
            picture: String::new(),
        };
        if let Err(e) = UserRepository::new(self.store.as_ref()).put(&user).await {
            panic!("failed to provision user {id}: {e}");
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        let Ok(response) = self.app.clone().oneshot(request).await;
        response
    }

    /// `GET` a path, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        self.send(build(request.body(Body::empty()))).await
    }

    /// `POST` a form to a path, optionally with a session cookie and `Accept`.
    pub async fn post_form(
        &self,
        path: &str,
        form: &str,
        cookie: Option<&str>,
        accept: Option<&str>,
    ) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(accept) = accept {
            request = request.header("accept", accept);
        }
        self.send(build(request.body(Body::from(form.to_string()))))
            .await
    }

    /// Start a sign-in. Returns the session cookie and the `state` token
    /// handed to the provider.
    pub async fn begin_login(&self) -> (String, String) {
        let response = self.get("/oauth", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let cookie = session_cookie(response.headers()).unwrap_or_else(|| {
            panic!("/oauth did not set a session cookie");
        });
        let location = location(&response);
        let url = url::Url::parse(&location)
            .unwrap_or_else(|e| panic!("bad authorization URL {location}: {e}"));
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| panic!("authorization URL has no state: {location}"));

        (cookie, state)
    }

    /// Run the whole sign-in flow and return the signed-in session cookie.
    pub async fn sign_in(&self) -> String {
        let (cookie, state) = self.begin_login().await;
        let response = self
            .get(
                &format!("/oauth/callback?code=test-code&state={state}"),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/links.html");

        session_cookie(response.headers()).unwrap_or(cookie)
    }
}

fn build(request: Result<Request<Body>, axum::http::Error>) -> Request<Body> {
    request.unwrap_or_else(|e| panic!("invalid test request: {e}"))
}

/// The `name=value` pair of the session cookie in a response, if set.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

/// The `Location` header of a response, or an empty string.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Read a response body as UTF-8.
pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("failed to read body: {e}"));
    String::from_utf8_lossy(&bytes).into_owned()
}
