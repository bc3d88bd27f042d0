use std::path::Path;

use anyhow::Result;
use classcal_core::config::ClassCalConfig;
use classcal_core::remote::ProviderGateway;
use classcal_core::{CalendarGateway, MemoryGateway, RawRow, SyncOptions, SyncOrchestrator};
use owo_colors::OwoColorize;

use crate::commands::{ScheduleArgs, sync_options};
use crate::render::Render;
use crate::rows;
use crate::utils::tui;

pub struct Mode {
    pub keep_existing: bool,
    pub dry_run: bool,
}

pub async fn run(
    path: &Path,
    schedule: &ScheduleArgs,
    concurrency: Option<usize>,
    mode: Mode,
) -> Result<()> {
    let mut config = ClassCalConfig::load()?;
    schedule.apply(&mut config);
    if let Some(concurrency) = concurrency {
        config.concurrency = concurrency;
    }
    let options = sync_options(&config)?;
    log::debug!("Sync options: {:?}", options);

    let rows = rows::load(path)?;

    if mode.dry_run {
        println!("{}", "Dry run: nothing is sent to your calendar".yellow());
        let gateway = MemoryGateway::new();
        return sync_rows(&gateway, options, &rows, mode.keep_existing).await;
    }

    let spinner = tui::create_spinner("Connecting...".to_string());
    let gateway = ProviderGateway::connect(config.provider(), config.remote_config()?).await;
    spinner.finish_and_clear();
    let gateway = gateway?;

    println!("Connected as {}", gateway.account().dimmed());

    sync_rows(&gateway, options, &rows, mode.keep_existing).await
}

async fn sync_rows<G: CalendarGateway>(
    gateway: &G,
    options: SyncOptions,
    rows: &[RawRow],
    keep_existing: bool,
) -> Result<()> {
    let orchestrator = SyncOrchestrator::new(gateway, options);
    let prefix = orchestrator.options().prefix.clone();

    if !keep_existing {
        let spinner = tui::create_spinner(format!("Removing earlier {prefix} events..."));
        let purged = orchestrator.purge().await;
        spinner.finish_and_clear();
        println!("{}", purged?.render());
    }

    let spinner = tui::create_spinner(format!("Creating events for {} row(s)...", rows.len()));
    let report = orchestrator.sync(rows).await;
    spinner.finish_and_clear();

    println!("{}", report.render());

    if report.failed_count() > 0 {
        anyhow::bail!("{} row(s) could not be synced", report.failed_count());
    }

    Ok(())
}
