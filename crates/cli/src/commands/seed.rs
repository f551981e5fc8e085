//! Seed command.
//!
//! Users cannot sign up through the web UI: an account is allowed in only if
//! a `User` record exists under its Google id. This command writes that
//! record, plus an `example` link so a fresh install has something to
//! redirect.

use golinks_core::{Email, ExternalId, User};
use golinks_server::db::{LinkRepository, PgDatastore, UserRepository};
use golinks_server::services::LinkService;

use super::{CliError, connect};

/// Slug of the example link.
pub const EXAMPLE_SLUG: &str = "example";

/// Destination of the example link.
pub const EXAMPLE_LOCATION: &str = "http://www.example.com";

/// Provision a user and the example link.
///
/// Re-running with the same id overwrites the user.
///
/// # Errors
///
/// Returns `CliError` if the email is invalid or the datastore fails.
pub async fn run(user_id: &str, email: &str, picture: &str) -> Result<(), CliError> {
    let user = User {
        id: ExternalId::new(user_id),
        email: Email::parse(email)?,
        picture: picture.to_owned(),
    };
    let example = LinkService::parse_link(EXAMPLE_SLUG, EXAMPLE_LOCATION)?;

    let store = PgDatastore::new(connect().await?);

    UserRepository::new(&store).put(&user).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "User provisioned");

    LinkRepository::new(&store).put(&example).await?;
    tracing::info!(slug = %example.slug, "Example link registered");

    tracing::info!("Seeding complete!");
    Ok(())
}
