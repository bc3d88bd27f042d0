//! RRULE expansion for translated events.
//!
//! Used to preview which dates a synced class will land on, and to check the
//! recurrence boundary without a round trip to the calendar service.

use chrono::NaiveDateTime;
use rrule::RRuleSet;

use crate::error::{ClassCalError, ClassCalResult};
use crate::translate::CalendarEventSpec;

/// Build an iCalendar-format DTSTART + RRULE block for the rrule crate parser.
fn build_rrule_string(spec: &CalendarEventSpec) -> String {
    format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        spec.timezone,
        spec.start.format("%Y%m%dT%H%M%S"),
        spec.recurrence.rrule()
    )
}

impl CalendarEventSpec {
    /// Wall-clock start of every occurrence, at most `limit` of them.
    pub fn occurrences(&self, limit: u16) -> ClassCalResult<Vec<NaiveDateTime>> {
        // Nothing to expand; rrule rejects an UNTIL before DTSTART.
        if self.start_utc().is_some_and(|start| self.recurrence.until < start) {
            return Ok(Vec::new());
        }

        let rrule_set: RRuleSet = build_rrule_string(self).parse().map_err(|e| {
            ClassCalError::Recurrence(format!(
                "Failed to parse RRULE for event '{}': {}",
                self.title, e
            ))
        })?;

        let result = rrule_set.all(limit);

        Ok(result.dates.iter().map(|dt| dt.naive_local()).collect())
    }
}
