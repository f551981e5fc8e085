//! Link management route handlers (signed-in users only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use golinks_core::Link;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::LinkError;
use crate::state::AppState;

/// Link registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The slug.
    pub id: String,
    /// The destination URL.
    pub location: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "links.html")]
pub struct LinksTemplate {
    pub user_id: String,
    pub base_url: String,
    pub links: Vec<Link>,
    pub error: Option<String>,
    pub form_id: String,
    pub form_location: String,
}

/// Whether the client is a browser submitting the HTML form.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// List all links with the registration form.
///
/// # Route
///
/// `GET /links.html`
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<LinksTemplate> {
    let links = state.links().list().await?;

    Ok(LinksTemplate {
        user_id: user.id.into_inner(),
        base_url: state.config().base_url.clone(),
        links,
        error: None,
        form_id: String::new(),
        form_location: String::new(),
    })
}

/// Register or overwrite a link.
///
/// Returns `204 No Content`, or `303 See Other` back to the list for the
/// browser form. Invalid input from the browser form re-renders the page
/// with the error.
///
/// # Route
///
/// `POST /links`
pub async fn register(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let html = wants_html(&headers);

    match state.links().register(&form.id, &form.location).await {
        Ok(_) if html => Ok(Redirect::to("/links.html").into_response()),
        Ok(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err @ (LinkError::InvalidSlug(_) | LinkError::InvalidDestination(_))) if html => {
            let links = state.links().list().await?;
            let page = LinksTemplate {
                user_id: user.id.into_inner(),
                base_url: state.config().base_url.clone(),
                links,
                error: Some(err.to_string()),
                form_id: form.id,
                form_location: form.location,
            };
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(err) => Err(AppError::from(err)),
    }
}
