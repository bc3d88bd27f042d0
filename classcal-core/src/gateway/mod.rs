//! The calendar service capability the core depends on.
//!
//! A gateway is an already-authenticated handle. Creating it (and tearing it
//! down) is the caller's job; the core only lists, creates and deletes.

mod memory;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;
use crate::translate::CalendarEventSpec;

pub use memory::MemoryGateway;

/// Upper bound on events fetched in one listing pass.
pub const MAX_LIST_RESULTS: u32 = 2500;

/// An event as reported by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    /// Id of the recurring series this event is an instance of, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
}

impl RemoteEvent {
    /// The id that removes the whole event: the series for recurring
    /// instances, the event itself otherwise.
    pub fn deletion_id(&self) -> &str {
        self.series_id.as_deref().unwrap_or(&self.id)
    }
}

/// Options for listing remote events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub max_results: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        ListFilter {
            max_results: MAX_LIST_RESULTS,
        }
    }
}

/// Create/list/delete access to one remote calendar.
///
/// Implementations must tolerate concurrent calls through a shared reference.
pub trait CalendarGateway: Sync {
    /// Events on the calendar ordered by start time, at most
    /// `filter.max_results` of them.
    fn list_events(
        &self,
        filter: &ListFilter,
    ) -> impl Future<Output = GatewayResult<Vec<RemoteEvent>>> + Send;

    /// Create a recurring event, returning its remote id.
    fn create_event(
        &self,
        spec: &CalendarEventSpec,
    ) -> impl Future<Output = GatewayResult<String>> + Send;

    fn delete_event(&self, event_id: &str) -> impl Future<Output = GatewayResult<()>> + Send;
}
