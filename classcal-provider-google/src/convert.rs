//! Conversions between classcal types and google_calendar types.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use classcal_core::gateway::RemoteEvent;
use classcal_core::translate::CalendarEventSpec;
use google_calendar::types::{Event, EventDateTime, EventReminder, Reminders};

pub trait ToGoogle {
    fn to_google(&self) -> Result<Event>;
}

impl ToGoogle for CalendarEventSpec {
    fn to_google(&self) -> Result<Event> {
        let unknown_zone = || anyhow!("Unknown timezone '{}'", self.timezone);
        let start = self.start_utc().ok_or_else(unknown_zone)?;
        let end = self.end_utc().ok_or_else(unknown_zone)?;

        Ok(Event {
            summary: self.title.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            start: Some(zoned_time(start, &self.timezone)),
            end: Some(zoned_time(end, &self.timezone)),
            recurrence: vec![format!("RRULE:{}", self.recurrence.rrule())],
            // Always explicit: no overrides means a silent event, not Google's defaults
            reminders: Some(Reminders {
                overrides: self
                    .reminders
                    .iter()
                    .map(|r| EventReminder {
                        method: r.method.as_str().to_string(),
                        minutes: i64::from(r.minutes_before),
                    })
                    .collect(),
                use_default: false,
            }),
            ..Default::default()
        })
    }
}

/// Google expands recurrences in `time_zone`, so the wall-clock time of every
/// occurrence stays fixed across DST changes.
fn zoned_time(instant: DateTime<Utc>, timezone: &str) -> EventDateTime {
    EventDateTime {
        date: None,
        date_time: Some(instant),
        time_zone: timezone.to_string(),
    }
}

pub trait FromGoogle {
    fn from_google(event: Event) -> Self;
}

impl FromGoogle for RemoteEvent {
    fn from_google(event: Event) -> Self {
        RemoteEvent {
            id: event.id,
            title: event.summary,
            series_id: Some(event.recurring_event_id).filter(|id| !id.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Weekday};
    use classcal_core::reminder::{ReminderConfig, ReminderMethod};
    use classcal_core::translate::Recurrence;

    fn spec(reminders: Vec<ReminderConfig>) -> CalendarEventSpec {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CalendarEventSpec {
            title: "[TKB] Giải tích".to_string(),
            location: "A2-301".to_string(),
            description: "Instructor: Nguyễn Văn A".to_string(),
            start: day.and_hms_opt(7, 0, 0).unwrap(),
            end: day.and_hms_opt(9, 30, 0).unwrap(),
            timezone: "Asia/Ho_Chi_Minh".to_string(),
            recurrence: Recurrence::weekly_until(
                Weekday::Mon,
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            ),
            reminders,
        }
    }

    #[test]
    fn test_to_google_event_body() {
        let event = spec(vec![ReminderConfig {
            method: ReminderMethod::Email,
            minutes_before: 1440,
        }])
        .to_google()
        .unwrap();

        assert_eq!(event.summary, "[TKB] Giải tích");
        assert_eq!(event.location, "A2-301");
        assert_eq!(
            event.recurrence,
            vec!["RRULE:FREQ=WEEKLY;BYDAY=MO;UNTIL=20240131T235959Z"]
        );

        let start = event.start.unwrap();
        assert_eq!(
            start.date_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(start.time_zone, "Asia/Ho_Chi_Minh");

        let reminders = event.reminders.unwrap();
        assert!(!reminders.use_default);
        assert_eq!(reminders.overrides[0].method, "email");
        assert_eq!(reminders.overrides[0].minutes, 1440);
    }

    #[test]
    fn test_empty_reminders_still_disable_defaults() {
        let reminders = spec(vec![]).to_google().unwrap().reminders.unwrap();
        assert!(!reminders.use_default);
        assert!(reminders.overrides.is_empty());
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let mut bad = spec(vec![]);
        bad.timezone = "Nowhere/Special".to_string();
        assert!(bad.to_google().is_err());
    }

    #[test]
    fn test_instances_carry_their_series() {
        let instance = RemoteEvent::from_google(Event {
            id: "abc_20240108T000000Z".to_string(),
            summary: "[TKB] Giải tích".to_string(),
            recurring_event_id: "abc".to_string(),
            ..Default::default()
        });
        assert_eq!(instance.deletion_id(), "abc");

        let single = RemoteEvent::from_google(Event {
            id: "xyz".to_string(),
            summary: "Dentist".to_string(),
            ..Default::default()
        });
        assert_eq!(single.series_id, None);
        assert_eq!(single.deletion_id(), "xyz");
    }
}
