//! Tavola CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tavola-cli migrate
//!
//! # Seed the sample menu and a default admin account
//! tavola-cli seed --admin-password 'pick-something-strong'
//!
//! # Create a staff account
//! tavola-cli admin create -e staff@tavola.example -n "Staff Name" -p 'password'
//! ```
//!
//! # Environment Variables
//!
//! - `TAVOLA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tavola-cli")]
#[command(author, version, about = "Tavola CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the sample menu and a default admin account
    Seed {
        /// Email for the default admin account
        #[arg(long, default_value = "admin@tavola.example")]
        admin_email: String,

        /// Password for the default admin account
        #[arg(long)]
        admin_password: String,
    },
    /// Manage staff accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new staff account
    Create {
        /// Staff email address
        #[arg(short, long)]
        email: String,

        /// Staff display name
        #[arg(short, long)]
        name: String,

        /// Password (hashed with argon2id before storage)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            admin_email,
            admin_password,
        } => commands::seed::run(&admin_email, &admin_password).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_account(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
