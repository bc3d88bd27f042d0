//! Schedule record → recurring calendar event.
//!
//! Translation is pure: it never talks to the calendar service. The result is
//! a [`CalendarEventSpec`] that a gateway turns into a remote event.

use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::reminder::ReminderConfig;
use crate::schedule::ScheduleRecord;

/// Map the spreadsheet's 2-based weekday (2 = Monday ... 7 = Saturday) onto a
/// 0-based Monday..Sunday index. Anything below 2 wraps onto Sunday (6).
pub fn weekday_index(weekday: i64) -> u8 {
    match weekday.checked_sub(2) {
        Some(offset) if offset >= 0 => (offset % 7) as u8,
        _ => 6,
    }
}

/// The chrono weekday a 2-based spreadsheet weekday refers to.
pub fn target_weekday(weekday: i64) -> Weekday {
    match weekday_index(weekday) {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// First date on or after `start` that falls on `weekday`.
pub fn anchor_date(start: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - start.weekday().num_days_from_monday()) % 7;
    start + Days::new(u64::from(ahead))
}

/// Weekly repetition on one weekday, up to and including `until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub weekday: Weekday,
    pub until: DateTime<Utc>,
}

impl Recurrence {
    /// Repeat weekly until the last second of `end_date` (UTC).
    pub fn weekly_until(weekday: Weekday, end_date: NaiveDate) -> Self {
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        Recurrence {
            weekday,
            until: end_date.and_time(last_second).and_utc(),
        }
    }

    /// RFC 5545 rule value, without the `RRULE:` prefix.
    pub fn rrule(&self) -> String {
        format!(
            "FREQ=WEEKLY;BYDAY={};UNTIL={}",
            ical_weekday(self.weekday),
            self.until.format("%Y%m%dT%H%M%SZ")
        )
    }
}

fn ical_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// A recurring event definition ready to be submitted to a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventSpec {
    pub title: String,
    pub location: String,
    pub description: String,
    /// Wall-clock start of the first occurrence, in `timezone`.
    pub start: NaiveDateTime,
    /// Wall-clock end of the first occurrence, in `timezone`.
    pub end: NaiveDateTime,
    /// IANA timezone identifier, passed through to the service as-is.
    pub timezone: String,
    pub recurrence: Recurrence,
    /// The complete reminder list; the service's default reminders are
    /// always disabled. Empty means no reminders at all.
    pub reminders: Vec<ReminderConfig>,
}

impl CalendarEventSpec {
    /// Absolute instant of the first occurrence's start.
    ///
    /// An ambiguous wall-clock time maps to its earlier instant, one skipped
    /// by a DST transition is shifted forward by an hour. `None` only when
    /// the timezone is unknown.
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        to_utc(&self.timezone, self.start)
    }

    /// Absolute instant of the first occurrence's end.
    pub fn end_utc(&self) -> Option<DateTime<Utc>> {
        to_utc(&self.timezone, self.end)
    }
}

fn to_utc(timezone: &str, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let tz: Tz = timezone.parse().ok()?;
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Title used for every event synced under `prefix`.
pub fn event_title(prefix: &str, subject: &str) -> String {
    format!("{prefix} {subject}")
}

/// Translate one schedule record into a recurring event definition.
pub fn translate(
    record: &ScheduleRecord,
    reminders: &[ReminderConfig],
    prefix: &str,
    timezone: Tz,
) -> CalendarEventSpec {
    let weekday = target_weekday(record.weekday);
    let anchor = anchor_date(record.start_date, weekday);

    CalendarEventSpec {
        title: event_title(prefix, &record.subject),
        location: record.room.clone(),
        description: format!("Instructor: {}", record.instructor),
        start: anchor.and_time(record.start_time),
        end: anchor.and_time(record.end_time),
        timezone: timezone.name().to_string(),
        recurrence: Recurrence::weekly_until(weekday, record.end_date),
        reminders: reminders.to_vec(),
    }
}
