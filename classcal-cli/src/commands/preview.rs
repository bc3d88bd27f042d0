//! Print what a sync would create without touching any calendar.

use std::path::Path;

use anyhow::Result;
use classcal_core::RowPlan;
use classcal_core::config::ClassCalConfig;
use owo_colors::OwoColorize;

use crate::commands::{ScheduleArgs, sync_options};
use crate::render::{self, Render};
use crate::rows;

/// At most this many dates are listed per event.
const MAX_OCCURRENCES: u16 = 60;

pub fn run(path: &Path, schedule: &ScheduleArgs) -> Result<()> {
    let mut config = ClassCalConfig::load()?;
    schedule.apply(&mut config);
    let options = sync_options(&config)?;

    let rows = rows::load(path)?;

    for (index, row) in rows.iter().enumerate() {
        match RowPlan::for_row(row, &options) {
            RowPlan::Event(spec) => {
                println!("{}", spec.render());
                let dates = spec.occurrences(MAX_OCCURRENCES)?;
                println!("   {}", render::render_dates(&dates).dimmed());
            }
            RowPlan::Skip(missing) => println!(
                "{}",
                format!("~ row {}: skipped (missing {})", index + 1, missing.join(", ")).dimmed()
            ),
            RowPlan::Invalid { subject, error } => println!(
                "{} row {} ({}): {}",
                "!".red(),
                index + 1,
                subject,
                error.to_string().red()
            ),
        }
    }

    Ok(())
}
