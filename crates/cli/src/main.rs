//! Factory inventory CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! fi-cli migrate
//!
//! # Register an account forwarded by the authentication layer
//! fi-cli account create --id auth0|42 --email ops@example.com --superuser
//!
//! # Seed selection options (built-in defaults or a YAML file)
//! fi-cli seed selection-options
//! fi-cli seed selection-options --file options.yaml --clear
//! ```
//!
//! # Environment Variables
//!
//! - `INVENTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fi-cli")]
#[command(author, version, about = "Factory inventory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account
    Create {
        /// Account id, as sent in the authentication header
        #[arg(long)]
        id: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Staff accounts may manage selection options
        #[arg(long)]
        staff: bool,

        /// Superusers see and manage every factory
        #[arg(long)]
        superuser: bool,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Category, supplier and unit choices for inventory forms
    SelectionOptions {
        /// YAML file mapping option types to ordered values
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Deactivate existing options of each seeded type first
        #[arg(long)]
        clear: bool,
    },
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Create {
                id,
                email,
                staff,
                superuser,
            } => {
                commands::account::create(&id, &email, staff, superuser).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::SelectionOptions { file, clear } => {
                commands::seed::selection_options(file.as_deref(), clear).await?;
            }
        },
    }
    Ok(())
}
