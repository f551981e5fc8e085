//! Link management commands.

use golinks_server::db::{LinkRepository, PgDatastore};
use golinks_server::services::LinkService;

use super::{CliError, connect};

/// Register or overwrite a link.
///
/// Input is validated the same way as a web registration.
///
/// # Errors
///
/// Returns `CliError` if the slug or destination is invalid, or the
/// datastore fails.
pub async fn add(id: &str, location: &str) -> Result<(), CliError> {
    let link = LinkService::parse_link(id, location)?;

    let store = PgDatastore::new(connect().await?);
    LinkRepository::new(&store).put(&link).await?;

    tracing::info!("{} -> {}", link.slug, link.destination);
    Ok(())
}

/// Print every link, one `slug<TAB>destination` per line.
///
/// # Errors
///
/// Returns `CliError` if the datastore fails.
pub async fn list() -> Result<(), CliError> {
    let store = PgDatastore::new(connect().await?);
    let links = LinkRepository::new(&store).list().await?;

    #[allow(clippy::print_stdout)]
    for link in &links {
        println!("{}\t{}", link.slug, link.destination);
    }

    tracing::info!(count = links.len(), "Links listed");
    Ok(())
}
