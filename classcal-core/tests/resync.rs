//! End-to-end behaviour of sync and purge against an in-memory calendar.

use std::collections::HashMap;

use classcal_core::{
    MemoryGateway, RawRow, ReminderConfig, ReminderMethod, SyncOptions, SyncOrchestrator,
    WeekdayCell,
};

fn row(subject: &str, weekday: i64, start_time: Option<&str>) -> RawRow {
    RawRow {
        subject: Some(subject.to_string()),
        room: Some("D3-201".to_string()),
        instructor: Some("Hoàng Thị E".to_string()),
        weekday: Some(WeekdayCell::Number(weekday)),
        start_time: start_time.map(str::to_string),
        end_time: Some("11:30".to_string()),
        start_date: Some("01/01/2024".to_string()),
        end_date: Some("31/01/2024".to_string()),
    }
}

fn schedule() -> Vec<RawRow> {
    vec![
        row("Giải tích", 2, Some("09:00")),
        row("Đại số", 4, Some("09:00")),
        row("Triết học", 6, Some("07:30")),
    ]
}

fn options(prefix: &str) -> SyncOptions {
    SyncOptions::new(prefix, chrono_tz::Asia::Ho_Chi_Minh)
        .unwrap()
        .with_reminders(vec![
            ReminderConfig::parse(ReminderMethod::Popup, "10 minutes").unwrap(),
        ])
}

/// Number of events per (title, weekday, start time).
fn triples(gateway: &MemoryGateway) -> HashMap<(String, chrono::Weekday, chrono::NaiveTime), usize> {
    let mut counts = HashMap::new();
    for (_, spec) in gateway.specs() {
        *counts
            .entry((spec.title.clone(), spec.recurrence.weekday, spec.start.time()))
            .or_insert(0) += 1;
    }
    counts
}

#[tokio::test]
async fn partial_rows_are_skipped_not_failed() {
    let gateway = MemoryGateway::new();
    let rows = vec![
        row("Giải tích", 2, Some("09:00")),
        row("Đại số", 4, None),
        row("Triết học", 6, Some("07:30")),
    ];

    let report = SyncOrchestrator::new(&gateway, options("[TKB]"))
        .sync(&rows)
        .await;

    assert_eq!(report.created_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].missing, vec!["start_time"]);
}

#[tokio::test]
async fn gateway_failure_is_isolated_to_its_record() {
    let gateway = MemoryGateway::new();
    gateway.fail_creates_matching("Đại số");

    let report = SyncOrchestrator::new(&gateway, options("[TKB]"))
        .sync(&schedule())
        .await;

    assert_eq!(report.created_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(gateway.len(), 2);
}

#[tokio::test]
async fn purge_then_sync_never_duplicates() {
    let gateway = MemoryGateway::new();
    let orchestrator = SyncOrchestrator::new(&gateway, options("[TKB]"));

    for _ in 0..3 {
        orchestrator.purge().await.unwrap();
        let report = orchestrator.sync(&schedule()).await;
        assert_eq!(report.created_count(), 3);
    }

    let counts = triples(&gateway);
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&n| n == 1));
}

#[tokio::test]
async fn replace_leaves_other_prefixes_alone() {
    let gateway = MemoryGateway::new();
    SyncOrchestrator::new(&gateway, options("[HK1]"))
        .sync(&schedule())
        .await;

    let orchestrator = SyncOrchestrator::new(&gateway, options("[HK2]").with_concurrency(3));
    orchestrator.sync(&schedule()).await;
    let (purged, report) = orchestrator.replace(&schedule()).await.unwrap();

    assert_eq!(purged.removed, 3);
    assert_eq!(report.created_count(), 3);
    assert_eq!(gateway.len(), 6);
    assert_eq!(
        gateway
            .specs()
            .iter()
            .filter(|(_, spec)| spec.title.starts_with("[HK1]"))
            .count(),
        3
    );
}

#[tokio::test]
async fn sync_without_purge_duplicates_on_purpose() {
    let gateway = MemoryGateway::new();
    let orchestrator = SyncOrchestrator::new(&gateway, options("[TKB]"));

    orchestrator.sync(&schedule()).await;
    orchestrator.sync(&schedule()).await;

    assert!(triples(&gateway).values().all(|&n| n == 2));
}

#[tokio::test]
async fn first_occurrence_and_boundary_for_a_monday_term() {
    let gateway = MemoryGateway::new();
    SyncOrchestrator::new(&gateway, options("[TKB]"))
        .sync(&[row("Giải tích", 2, Some("09:00"))])
        .await;

    let (_, spec) = &gateway.specs()[0];
    assert_eq!(spec.start.to_string(), "2024-01-01 09:00:00");
    assert_eq!(spec.recurrence.rrule(), "FREQ=WEEKLY;BYDAY=MO;UNTIL=20240131T235959Z");
    assert_eq!(spec.occurrences(10).unwrap().len(), 5);
}
