mod commands;
mod render;
mod rows;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::ScheduleArgs;

#[derive(Parser)]
#[command(name = "classcal")]
#[command(about = "Turn a weekly class schedule into recurring calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a calendar account (opens the browser)
    Auth {
        /// Provider to authenticate with
        #[arg(long)]
        provider: Option<String>,
    },
    /// Create one recurring event per schedule row
    Sync {
        /// JSON file with the schedule rows
        rows: PathBuf,

        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Number of events submitted at the same time
        #[arg(long)]
        concurrency: Option<usize>,

        /// Don't remove events from earlier syncs first (may create duplicates)
        #[arg(long)]
        keep_existing: bool,

        /// Run against an in-memory calendar instead of the real one
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove every event whose title starts with the prefix
    Purge {
        /// Title prefix of the events to remove
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show the events a sync would create, with their dates
    Preview {
        /// JSON file with the schedule rows
        rows: PathBuf,

        #[command(flatten)]
        schedule: ScheduleArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth { provider } => commands::auth::run(provider.as_deref()).await,
        Commands::Sync {
            rows,
            schedule,
            concurrency,
            keep_existing,
            dry_run,
        } => {
            commands::sync::run(
                &rows,
                &schedule,
                concurrency,
                commands::sync::Mode {
                    keep_existing,
                    dry_run,
                },
            )
            .await
        }
        Commands::Purge { prefix } => commands::purge::run(prefix.as_deref()).await,
        Commands::Preview { rows, schedule } => commands::preview::run(&rows, &schedule),
    }
}
