//! golinks CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the schema and the session table
//! golinks migrate
//!
//! # Provision a user and an example link
//! golinks seed --user-id 110169484474386276334 --email jane@example.com
//!
//! # Register a link without going through the web UI
//! golinks link add docs https://docs.example.com
//!
//! # List all links
//! golinks link list
//! ```
//!
//! # Environment Variables
//!
//! - `GOLINKS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "golinks")]
#[command(author, version, about = "golinks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Provision a user and the example link
    Seed {
        /// Google account id of the user
        #[arg(long, env = "USER_ID")]
        user_id: String,

        /// User email address
        #[arg(long, env = "USER_EMAIL")]
        email: String,

        /// Avatar URL
        #[arg(long, env = "USER_PICTURE", default_value = "")]
        picture: String,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Register or overwrite a link
    Add {
        /// Slug, e.g. `docs` or `docs/rust`
        id: String,

        /// Absolute http(s) destination
        location: String,
    },
    /// List all links
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            user_id,
            email,
            picture,
        } => commands::seed::run(&user_id, &email, &picture).await?,
        Commands::Link { action } => match action {
            LinkAction::Add { id, location } => commands::link::add(&id, &location).await?,
            LinkAction::List => commands::link::list().await?,
        },
    }
    Ok(())
}
