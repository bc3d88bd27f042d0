//! Batch sync of a schedule onto a calendar.
//!
//! Every row is handled independently: a skipped or failing row never stops
//! the rest of the schedule from being submitted. The report is ordered by
//! input row, whatever order submissions complete in.

use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{ClassCalError, ClassCalResult, TranslationError};
use crate::gateway::CalendarGateway;
use crate::reconcile::{PurgeReport, Reconciler};
use crate::reminder::ReminderConfig;
use crate::schedule::{RawRow, ScheduleRecord};
use crate::translate::{CalendarEventSpec, translate};

/// Everything a sync run needs besides the rows and the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    pub prefix: String,
    pub timezone: Tz,
    pub reminders: Vec<ReminderConfig>,
    pub concurrency: usize,
}

impl SyncOptions {
    pub fn new(prefix: impl Into<String>, timezone: Tz) -> ClassCalResult<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(ClassCalError::EmptyPrefix);
        }

        Ok(SyncOptions {
            prefix,
            timezone,
            reminders: Vec::new(),
            concurrency: 1,
        })
    }

    pub fn with_reminders(mut self, reminders: Vec<ReminderConfig>) -> Self {
        self.reminders = reminders;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// What a single row turns into before anything is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPlan {
    Event(Box<CalendarEventSpec>),
    Skip(Vec<&'static str>),
    Invalid {
        subject: String,
        error: TranslationError,
    },
}

impl RowPlan {
    pub fn for_row(row: &RawRow, options: &SyncOptions) -> Self {
        match ScheduleRecord::from_row(row) {
            Ok(Some(record)) => RowPlan::Event(Box::new(translate(
                &record,
                &options.reminders,
                &options.prefix,
                options.timezone,
            ))),
            Ok(None) => RowPlan::Skip(row.missing_fields()),
            Err(error) => RowPlan::Invalid {
                subject: row_subject(row),
                error,
            },
        }
    }
}

/// The row's subject as reported back, without the title prefix.
fn row_subject(row: &RawRow) -> String {
    row.subject.as_deref().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedEvent {
    pub index: usize,
    pub event_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub index: usize,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Translation,
    Gateway,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub index: usize,
    pub subject: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Structured outcome of a sync run, suitable for rendering partial success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: Vec<CreatedEvent>,
    pub skipped: Vec<SkippedRow>,
    pub failed: Vec<RecordFailure>,
}

impl SyncReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn failure_reasons(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("row {} ({}): {}", f.index + 1, f.subject, f.reason))
            .collect()
    }
}

enum RowOutcome {
    Created(CreatedEvent),
    Skipped(SkippedRow),
    Failed(RecordFailure),
}

/// Drives translation and submission for a batch of rows.
pub struct SyncOrchestrator<'a, G> {
    gateway: &'a G,
    options: SyncOptions,
}

impl<'a, G: CalendarGateway> SyncOrchestrator<'a, G> {
    pub fn new(gateway: &'a G, options: SyncOptions) -> Self {
        SyncOrchestrator { gateway, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Translate every row without submitting anything.
    pub fn plan(&self, rows: &[RawRow]) -> Vec<RowPlan> {
        rows.iter()
            .map(|row| RowPlan::for_row(row, &self.options))
            .collect()
    }

    /// Create one recurring event per valid row.
    pub async fn sync(&self, rows: &[RawRow]) -> SyncReport {
        let work = rows.iter().map(row_subject).zip(self.plan(rows)).enumerate();
        let outcomes: Vec<RowOutcome> = stream::iter(work)
            .map(|(index, (subject, plan))| self.submit(index, subject, plan))
            .buffered(self.options.concurrency)
            .collect()
            .await;

        let mut report = SyncReport::default();
        for outcome in outcomes {
            match outcome {
                RowOutcome::Created(created) => report.created.push(created),
                RowOutcome::Skipped(skipped) => report.skipped.push(skipped),
                RowOutcome::Failed(failure) => report.failed.push(failure),
            }
        }

        log::info!(
            "Sync finished: {} created, {} skipped, {} failed",
            report.created_count(),
            report.skipped_count(),
            report.failed_count()
        );

        report
    }

    async fn submit(&self, index: usize, subject: String, plan: RowPlan) -> RowOutcome {
        match plan {
            RowPlan::Skip(missing) => {
                log::debug!("Skipping row {}: missing {}", index + 1, missing.join(", "));
                RowOutcome::Skipped(SkippedRow { index, missing })
            }
            RowPlan::Invalid { error, .. } => {
                log::warn!("Row {} ({}) is invalid: {}", index + 1, subject, error);
                RowOutcome::Failed(RecordFailure {
                    index,
                    subject,
                    kind: FailureKind::Translation,
                    reason: error.to_string(),
                })
            }
            RowPlan::Event(spec) => match self.gateway.create_event(&spec).await {
                Ok(event_id) => {
                    log::debug!("Created '{}' ({})", spec.title, event_id);
                    RowOutcome::Created(CreatedEvent {
                        index,
                        event_id,
                        title: spec.title,
                    })
                }
                Err(e) => {
                    log::warn!("Failed to create '{}': {}", spec.title, e);
                    RowOutcome::Failed(RecordFailure {
                        index,
                        subject,
                        kind: FailureKind::Gateway,
                        reason: e.to_string(),
                    })
                }
            },
        }
    }

    /// Remove every event previously synced under this run's prefix.
    pub async fn purge(&self) -> ClassCalResult<PurgeReport> {
        Reconciler::new(self.gateway)
            .with_concurrency(self.options.concurrency)
            .purge(&self.options.prefix)
            .await
    }

    /// Purge, then sync: re-importing the same schedule yields the same
    /// calendar instead of duplicates.
    ///
    /// A failure to scan the calendar aborts before anything is created;
    /// individual failed deletes do not.
    pub async fn replace(&self, rows: &[RawRow]) -> ClassCalResult<(PurgeReport, SyncReport)> {
        let purged = self.purge().await?;
        let report = self.sync(rows).await;
        Ok((purged, report))
    }
}
