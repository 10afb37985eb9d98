//! CLI administration tool for url-shortener.
//!
//! Inspects stored entries and exercises the identifier generator without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Print freshly generated identifiers
//! cargo run --bin admin -- id generate --count 5
//!
//! # Show a stored entry
//! cargo run --bin admin -- entry show 1bqPzWl3xUQa
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `url_shortener::config`). `entry` and `db`
//! commands require `DATABASE_URL` or the `DB_*` components.

use url_shortener::config::{self, Config};
use url_shortener::domain::repositories::EntryRepository;
use url_shortener::infrastructure::persistence::PgEntryRepository;
use url_shortener::server::connect_pool;
use url_shortener::utils::id_generator::{Alphabet, IdGenerator};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Identifier tools
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Inspect stored entries
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum IdAction {
    /// Generate identifiers with the configured alphabet
    Generate {
        /// Number of identifiers to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum EntryAction {
    /// Show an entry by identifier
    Show {
        /// Short identifier
        id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and count entries
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Id { action } => handle_id_action(action, &config),
        Commands::Entry { action } => {
            let pool = connect(&config).await?;
            handle_entry_action(action, pool).await
        }
        Commands::Db { action } => {
            let pool = connect(&config).await?;
            handle_db_action(action, &pool).await
        }
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME must be set")?;

    connect_pool(config, url).await
}

fn handle_id_action(action: IdAction, config: &Config) -> Result<()> {
    match action {
        IdAction::Generate { count } => {
            let alphabet = Arc::new(Alphabet::from_kind(
                config.id_alphabet,
                config.id_alphabet_seed,
            ));
            let generator = IdGenerator::new(alphabet);

            println!(
                "{} {}",
                "Alphabet:".bright_white().bold(),
                generator.alphabet().as_str().cyan()
            );

            for _ in 0..count {
                let id = generator
                    .generate()
                    .map_err(|e| anyhow::anyhow!("Failed to generate identifier: {}", e))?;
                println!("  {}", id.bright_yellow());
            }
        }
    }

    Ok(())
}

async fn handle_entry_action(action: EntryAction, pool: PgPool) -> Result<()> {
    let repo = PgEntryRepository::new(Arc::new(pool));

    match action {
        EntryAction::Show { id } => {
            let entry = repo
                .find_by_id(&id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load entry: {}", e))?;

            match entry {
                Some(entry) => {
                    println!("{}", "Entry:".bright_white().bold());
                    println!("  ID:      {}", entry.id.cyan());
                    println!("  URL:     {}", entry.url);
                    println!("  Count:   {}", entry.access_count.to_string().bright_yellow());
                    println!("  Created: {}", entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
                }
                None => {
                    println!("{} {}", "No entry with identifier".red(), id.bold());
                }
            }
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
                .fetch_one(pool)
                .await
                .context("Failed to query short_urls")?;

            println!("{}", "Database connection OK".green().bold());
            println!("  Entries: {}", count.to_string().bright_yellow());
        }
    }

    Ok(())
}
