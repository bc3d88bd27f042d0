//! In-process gateway. Backs `--dry-run` and the test suites.

use std::sync::{Mutex, MutexGuard};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{CalendarGateway, ListFilter, RemoteEvent};
use crate::translate::CalendarEventSpec;

#[derive(Default)]
struct State {
    events: Vec<(String, CalendarEventSpec)>,
    next_id: u64,
    failing_titles: Vec<String>,
    failing_deletes: Vec<String>,
}

/// A calendar held in memory.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave the Vecs half-updated.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store an event directly, as if it had been created earlier.
    pub fn insert(&self, spec: CalendarEventSpec) -> String {
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("mem-{}", state.next_id);
        state.events.push((id.clone(), spec));
        id
    }

    /// Make `create_event` fail for every title containing `pattern`.
    pub fn fail_creates_matching(&self, pattern: impl Into<String>) {
        self.state().failing_titles.push(pattern.into());
    }

    /// Make `delete_event` fail for `event_id`.
    pub fn fail_delete_of(&self, event_id: impl Into<String>) {
        self.state().failing_deletes.push(event_id.into());
    }

    /// Every stored event, in creation order.
    pub fn specs(&self) -> Vec<(String, CalendarEventSpec)> {
        self.state().events.clone()
    }

    pub fn len(&self) -> usize {
        self.state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CalendarGateway for MemoryGateway {
    async fn list_events(&self, filter: &ListFilter) -> GatewayResult<Vec<RemoteEvent>> {
        let state = self.state();

        let mut events: Vec<&(String, CalendarEventSpec)> = state.events.iter().collect();
        events.sort_by_key(|(_, spec)| spec.start);

        Ok(events
            .into_iter()
            .take(filter.max_results as usize)
            .map(|(id, spec)| RemoteEvent {
                id: id.clone(),
                title: spec.title.clone(),
                series_id: None,
            })
            .collect())
    }

    async fn create_event(&self, spec: &CalendarEventSpec) -> GatewayResult<String> {
        let failing = self
            .state()
            .failing_titles
            .iter()
            .any(|pattern| spec.title.contains(pattern.as_str()));
        if failing {
            return Err(GatewayError::Provider(format!(
                "Rejected event '{}'",
                spec.title
            )));
        }

        Ok(self.insert(spec.clone()))
    }

    async fn delete_event(&self, event_id: &str) -> GatewayResult<()> {
        let mut state = self.state();

        if state.failing_deletes.iter().any(|id| id == event_id) {
            return Err(GatewayError::Transport(format!(
                "Connection reset while deleting {event_id}"
            )));
        }

        let before = state.events.len();
        state.events.retain(|(id, _)| id != event_id);
        if state.events.len() == before {
            return Err(GatewayError::NotFound(event_id.to_string()));
        }

        Ok(())
    }
}
