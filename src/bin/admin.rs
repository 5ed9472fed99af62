//! Operator CLI for go-links.
//!
//! Inspects and clears admin rate-limit records, prints totals and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show every tracked IP
//! cargo run --bin admin -- ratelimit list
//!
//! # Unblock an IP (asks for confirmation unless -y)
//! cargo run --bin admin -- ratelimit unblock 203.0.113.7
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use go_links::config::{Config, mask_connection_string};
use go_links::domain::clock::{Clock, SystemClock};
use go_links::domain::repositories::{AnalyticsRepository, LinkRepository, RateLimitRepository};
use go_links::infrastructure::persistence::{
    PgAnalyticsRepository, PgLinkRepository, PgRateLimitRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing go-links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and clear admin rate-limit records
    Ratelimit {
        #[command(subcommand)]
        action: RateLimitAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum RateLimitAction {
    /// List tracked IPs with their failure counts and blocks
    List,

    /// Remove the record of an IP, lifting any block
    Unblock {
        /// IP address as recorded (e.g. 203.0.113.7)
        ip: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Ratelimit { action } => {
            let repo = PgRateLimitRepository::new(pool.clone());
            match action {
                RateLimitAction::List => list_rate_limits(&repo).await?,
                RateLimitAction::Unblock { ip, yes } => unblock_ip(&repo, &ip, yes).await?,
            }
        }
        Commands::Stats => handle_stats(pool.clone()).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Prints every rate-limit record, blocked ones in red.
async fn list_rate_limits(repo: &PgRateLimitRepository) -> Result<()> {
    println!("{}", "Rate limit records".bright_blue().bold());
    println!();

    let records = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No failed attempts recorded".green());
        println!();
        return Ok(());
    }

    println!(
        "  {:<40} {:<9} {:<17} {:<17} {}",
        "IP".bright_white().bold(),
        "Failures".bright_white().bold(),
        "First attempt".bright_white().bold(),
        "Last attempt".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(100).bright_black());

    let now = SystemClock.now();

    for record in &records {
        let status = match record.blocked_at(now) {
            Some(until) => format!("BLOCKED until {}", until.format("%Y-%m-%d %H:%M")).red(),
            None => "active".green(),
        };

        println!(
            "  {:<40} {:<9} {:<17} {:<17} {}",
            record.ip_address.cyan(),
            record.failed_attempts,
            record
                .first_attempt_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record
                .last_attempt_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes the record of `ip` after confirmation.
async fn unblock_ip(repo: &PgRateLimitRepository, ip: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "Unblock IP".bright_blue().bold());
    println!();
    println!("  IP: {}", ip.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove the rate-limit record of this IP?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let removed = repo
        .delete(ip)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to unblock IP: {}", e))?;

    if removed {
        println!("{}", "IP unblocked".green().bold());
    } else {
        println!("{}", "No record found for this IP".yellow());
    }
    println!();

    Ok(())
}

/// Displays link and click totals and the number of blocked IPs.
async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links = PgLinkRepository::new(pool.clone());
    let analytics = PgAnalyticsRepository::new(pool.clone());
    let rate_limits = PgRateLimitRepository::new(pool);

    let links_count = links
        .count(None)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let events_count = analytics
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let records = rate_limits
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let now = SystemClock.now();
    let blocked = records
        .iter()
        .filter(|r| r.blocked_at(now).is_some())
        .count();

    println!(
        "  Links:            {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Recorded clicks:  {}",
        events_count.to_string().bright_green().bold()
    );
    println!(
        "  Tracked IPs:      {}",
        records.len().to_string().bright_green().bold()
    );
    println!(
        "  Blocked IPs:      {}",
        blocked.to_string().bright_red().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
