//! Schedule rows as they arrive from a spreadsheet export, and the validated
//! record the translator works on.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::TranslationError;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Weekday value the spreadsheet uses for Sunday ("Chủ nhật").
const SUNDAY_CELL: i64 = 8;

/// A weekday cell: spreadsheets export it as an integer, a float (`2.0`) or
/// as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeekdayCell {
    Number(i64),
    Float(f64),
    Text(String),
}

impl WeekdayCell {
    /// The 2-based weekday number, or `None` when the cell is blank.
    ///
    /// `0` is treated as blank, matching how empty numeric cells come out of
    /// spreadsheet exports.
    pub fn value(&self) -> Result<Option<i64>, TranslationError> {
        let number = match self {
            WeekdayCell::Number(n) => *n,
            WeekdayCell::Float(f) => {
                integral(*f).ok_or_else(|| TranslationError::InvalidWeekday(f.to_string()))?
            }
            WeekdayCell::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                if text.eq_ignore_ascii_case("cn") {
                    return Ok(Some(SUNDAY_CELL));
                }
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(integral))
                    .ok_or_else(|| TranslationError::InvalidWeekday(text.to_string()))?
            }
        };

        Ok((number != 0).then_some(number))
    }
}

/// `3.0` → `3`; fractional and non-finite values have no weekday.
fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// One unvalidated row of the schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRow {
    pub subject: Option<String>,
    pub room: Option<String>,
    pub instructor: Option<String>,
    pub weekday: Option<WeekdayCell>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RawRow {
    /// Names of the fields whose absence makes the row skippable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        let weekday_blank = match &self.weekday {
            None => true,
            // A malformed weekday is not "missing"; it fails later instead.
            Some(cell) => matches!(cell.value(), Ok(None)),
        };
        if weekday_blank {
            missing.push("weekday");
        }
        if is_blank(&self.start_time) {
            missing.push("start_time");
        }
        if is_blank(&self.end_time) {
            missing.push("end_time");
        }

        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

/// A validated class-schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub subject: String,
    pub room: String,
    pub instructor: String,
    /// 2 = Monday ... 7 = Saturday; other values wrap onto Sunday.
    pub weekday: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScheduleRecord {
    /// Build a record from a raw row.
    ///
    /// Returns `Ok(None)` when the row lacks a weekday, start time or end
    /// time; such rows are skipped rather than failed.
    pub fn from_row(row: &RawRow) -> Result<Option<Self>, TranslationError> {
        if !row.missing_fields().is_empty() {
            return Ok(None);
        }

        let weekday = match row.weekday.as_ref().map(WeekdayCell::value).transpose()? {
            Some(Some(weekday)) => weekday,
            _ => return Ok(None),
        };

        let subject = text(&row.subject);
        if subject.is_empty() {
            return Err(TranslationError::EmptySubject);
        }

        let start_time = parse_time("start_time", &text(&row.start_time))?;
        let end_time = parse_time("end_time", &text(&row.end_time))?;
        if start_time >= end_time {
            return Err(TranslationError::EmptyTimeSlot {
                start: start_time,
                end: end_time,
            });
        }

        let start_date = parse_date("start_date", &text(&row.start_date))?;
        let end_date = parse_date("end_date", &text(&row.end_date))?;
        if start_date > end_date {
            return Err(TranslationError::InvertedDateRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Some(ScheduleRecord {
            subject,
            room: text(&row.room),
            instructor: text(&row.instructor),
            weekday,
            start_time,
            end_time,
            start_date,
            end_date,
        }))
    }
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, TranslationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        TranslationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

/// Parse a 24-hour `HH:MM` time (seconds are tolerated).
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, TranslationError> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| TranslationError::InvalidTime {
            field,
            value: value.to_string(),
        })
}
