//! TUI rendering traits for classcal types.
//!
//! Extension traits that add colored terminal output to classcal-core types
//! using owo_colors.

use chrono::NaiveDateTime;
use classcal_core::{CalendarEventSpec, PurgeReport, SyncReport};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

/// Above this many rows per section, print a count instead of every row.
const COMPACT_THRESHOLD: usize = 10;

impl Render for CalendarEventSpec {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {} {}-{}",
            "+".green(),
            self.title.green(),
            self.start.format("%a").to_string().dimmed(),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
        );
        if !self.location.is_empty() {
            line.push_str(&format!(" @ {}", self.location));
        }
        line
    }
}

impl Render for PurgeReport {
    fn render(&self) -> String {
        if self.matched == 0 {
            return "   No earlier events to remove".dimmed().to_string();
        }

        let mut lines = vec![format!(
            "   {} {}",
            "-".red(),
            format!("Removed {} of {} {}", self.removed, self.matched, pluralize(self.matched))
                .red()
        )];

        for failure in &self.failures {
            lines.push(format!(
                "   {} {} {}",
                "!".red(),
                failure.title,
                failure.reason.dimmed()
            ));
        }

        lines.join("\n")
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        if self.created.len() > COMPACT_THRESHOLD {
            let label = format!("({} new {})", self.created_count(), pluralize(self.created_count()));
            lines.push(format!("   {} {}", "+".green(), label.green()));
        } else {
            for created in &self.created {
                lines.push(format!("   {} {}", "+".green(), created.title.green()));
            }
        }

        for skipped in &self.skipped {
            lines.push(
                format!(
                    "   ~ row {} skipped (missing {})",
                    skipped.index + 1,
                    skipped.missing.join(", ")
                )
                .dimmed()
                .to_string(),
            );
        }

        for reason in self.failure_reasons() {
            lines.push(format!("   {} {}", "!".red(), reason.red()));
        }

        lines.push(format!(
            "\nSynced: {} created, {} skipped, {} failed",
            self.created_count(),
            self.skipped_count(),
            self.failed_count()
        ));

        lines.join("\n")
    }
}

/// Comma-separated occurrence dates, e.g. `01/01, 08/01, 15/01`.
pub fn render_dates(dates: &[NaiveDateTime]) -> String {
    if dates.is_empty() {
        return "no occurrences in the date range".to_string();
    }

    dates
        .iter()
        .map(|d| d.format("%d/%m").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "event" } else { "events" }
}
