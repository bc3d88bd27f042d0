//! Removing events left behind by an earlier sync.
//!
//! Events are identified solely by their title prefix, so a purge followed by
//! a sync with the same prefix replaces the schedule instead of duplicating it.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{ClassCalError, ClassCalResult, GatewayError};
use crate::gateway::{CalendarGateway, ListFilter, RemoteEvent};

/// Outcome of a purge. Deletion is best-effort, so failures sit next to the
/// count instead of aborting the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub matched: usize,
    pub removed: usize,
    pub failures: Vec<DeleteFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub event_id: String,
    pub title: String,
    pub reason: String,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Reconciler<'a, G> {
    gateway: &'a G,
    concurrency: usize,
}

impl<'a, G: CalendarGateway> Reconciler<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Reconciler {
            gateway,
            concurrency: 1,
        }
    }

    /// Delete up to `concurrency` events at a time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Remote events tagged with `prefix`, one entry per deletable event.
    ///
    /// Instances of the same recurring series collapse onto the series.
    pub async fn matching(&self, prefix: &str) -> ClassCalResult<Vec<RemoteEvent>> {
        if prefix.trim().is_empty() {
            return Err(ClassCalError::EmptyPrefix);
        }

        let events = self.gateway.list_events(&ListFilter::default()).await?;
        log::debug!("Scanned {} remote events for prefix '{}'", events.len(), prefix);

        let mut seen = HashSet::new();
        Ok(events
            .into_iter()
            .filter(|event| event.title.starts_with(prefix))
            .filter(|event| seen.insert(event.deletion_id().to_string()))
            .collect())
    }

    /// Delete every event whose title starts with `prefix`.
    pub async fn purge(&self, prefix: &str) -> ClassCalResult<PurgeReport> {
        let targets = self.matching(prefix).await?;

        let outcomes: Vec<(RemoteEvent, Result<(), GatewayError>)> = stream::iter(targets)
            .map(|event| async move {
                let result = self.gateway.delete_event(event.deletion_id()).await;
                (event, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = PurgeReport {
            matched: outcomes.len(),
            ..PurgeReport::default()
        };

        for (event, result) in outcomes {
            match result {
                Ok(()) => report.removed += 1,
                Err(GatewayError::NotFound(_)) => {
                    log::debug!("'{}' was already gone", event.title);
                    report.removed += 1;
                }
                Err(e) => {
                    log::warn!("Failed to delete '{}': {}", event.title, e);
                    report.failures.push(DeleteFailure {
                        event_id: event.deletion_id().to_string(),
                        title: event.title,
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Purged {}/{} events with prefix '{}'",
            report.removed,
            report.matched,
            prefix
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayResult;
    use crate::gateway::MemoryGateway;
    use crate::translate::{CalendarEventSpec, Recurrence};
    use chrono::{NaiveDate, Weekday};
    use std::sync::Mutex;

    fn spec(title: &str, day: u32) -> CalendarEventSpec {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        CalendarEventSpec {
            title: title.to_string(),
            location: String::new(),
            description: String::new(),
            start: date.and_hms_opt(7, 0, 0).unwrap(),
            end: date.and_hms_opt(9, 0, 0).unwrap(),
            timezone: "Asia/Ho_Chi_Minh".to_string(),
            recurrence: Recurrence::weekly_until(Weekday::Mon, date),
            reminders: vec![],
        }
    }

    #[tokio::test]
    async fn test_purge_removes_only_prefixed_events() {
        let gateway = MemoryGateway::new();
        gateway.insert(spec("[TKB] Toán", 1));
        gateway.insert(spec("Dentist", 2));
        gateway.insert(spec("[TKB] Lý", 3));

        let report = Reconciler::new(&gateway).purge("[TKB]").await.unwrap();

        assert_eq!(report.matched, 2);
        assert_eq!(report.removed, 2);
        assert!(report.is_complete());
        let remaining: Vec<String> = gateway.specs().into_iter().map(|(_, s)| s.title).collect();
        assert_eq!(remaining, vec!["Dentist"]);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_stop_the_scan() {
        let gateway = MemoryGateway::new();
        gateway.insert(spec("[TKB] Toán", 1));
        let stuck = gateway.insert(spec("[TKB] Lý", 2));
        gateway.insert(spec("[TKB] Hóa", 3));
        gateway.fail_delete_of(stuck.clone());

        let report = Reconciler::new(&gateway)
            .with_concurrency(2)
            .purge("[TKB]")
            .await
            .unwrap();

        assert_eq!(report.matched, 3);
        assert_eq!(report.removed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].event_id, stuck);
        assert_eq!(report.failures[0].title, "[TKB] Lý");
        assert_eq!(gateway.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_prefix_is_refused() {
        let gateway = MemoryGateway::new();
        gateway.insert(spec("Dentist", 1));

        let err = Reconciler::new(&gateway).purge("").await.unwrap_err();

        assert!(matches!(err, ClassCalError::EmptyPrefix));
        assert_eq!(gateway.len(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_prefix_is_refused() {
        let gateway = MemoryGateway::new();
        gateway.insert(spec(" Dentist", 1));

        let err = Reconciler::new(&gateway).purge("  ").await.unwrap_err();

        assert!(matches!(err, ClassCalError::EmptyPrefix));
        assert_eq!(gateway.len(), 1);
    }

    /// Lists expanded instances the way Google does with `singleEvents`.
    struct InstanceGateway {
        deleted: Mutex<Vec<String>>,
    }

    impl CalendarGateway for InstanceGateway {
        async fn list_events(&self, _filter: &ListFilter) -> GatewayResult<Vec<RemoteEvent>> {
            let instance = |id: &str, series: &str, title: &str| RemoteEvent {
                id: id.to_string(),
                title: title.to_string(),
                series_id: Some(series.to_string()),
            };
            Ok(vec![
                instance("s1_20240101", "s1", "[TKB] Toán"),
                instance("s2_20240102", "s2", "[TKB] Lý"),
                instance("s1_20240108", "s1", "[TKB] Toán"),
                instance("s2_20240109", "s2", "[TKB] Lý"),
                RemoteEvent {
                    id: "single".to_string(),
                    title: "[TKB] Thi cuối kỳ".to_string(),
                    series_id: None,
                },
            ])
        }

        async fn create_event(&self, _spec: &CalendarEventSpec) -> GatewayResult<String> {
            unreachable!("purge never creates")
        }

        async fn delete_event(&self, event_id: &str) -> GatewayResult<()> {
            self.deleted.lock().unwrap().push(event_id.to_string());
            if event_id == "s2" {
                // Deleted concurrently by someone else
                return Err(GatewayError::NotFound(event_id.to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_series_instances_are_deleted_once() {
        let gateway = InstanceGateway {
            deleted: Mutex::new(Vec::new()),
        };

        let report = Reconciler::new(&gateway).purge("[TKB]").await.unwrap();

        assert_eq!(report.matched, 3);
        assert_eq!(report.removed, 3);
        assert_eq!(*gateway.deleted.lock().unwrap(), vec!["s1", "s2", "single"]);
    }
}
