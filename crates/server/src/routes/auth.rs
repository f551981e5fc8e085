//! Sign-in route handlers.
//!
//! - `GET /login.html` renders the sign-in page
//! - `GET /oauth` starts the Google handshake
//! - `GET /oauth/callback` finishes it

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, set_sentry_user};
use crate::middleware::{LOGIN_PATH, OptionalUser};
use crate::models::session_keys;
use crate::state::AppState;

/// Where a successful sign-in lands.
pub const AFTER_LOGIN_PATH: &str = "/links.html";

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if the visitor declined or Google failed.
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub signed_in: bool,
}

/// Map a login-page error code to a message. Unknown codes are not echoed.
fn error_message(code: &str) -> &'static str {
    match code {
        "denied" => "Sign-in was cancelled.",
        _ => "Sign-in failed, please try again.",
    }
}

/// Display the login page.
///
/// # Route
///
/// `GET /login.html`
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> LoginTemplate {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        signed_in: user.is_some(),
    }
}

/// Redirect to Google's consent page.
///
/// # Route
///
/// `GET /oauth`
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let url = state.auth().begin_login(&session).await?;
    Ok(Redirect::temporary(&url))
}

/// Handle the OAuth callback.
///
/// # Route
///
/// `GET /oauth/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    if let Some(error) = query.error {
        tracing::warn!(error = %error, "Google OAuth error");
        session.remove::<String>(session_keys::OAUTH_STATE).await?;
        return Ok(Redirect::temporary(&format!("{LOGIN_PATH}?error=denied")));
    }

    let user = state
        .auth()
        .complete_login(&session, query.code.as_deref(), query.state.as_deref())
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Redirect::temporary(AFTER_LOGIN_PATH))
}
