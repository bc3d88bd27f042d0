//! Core of classcal: weekly class schedules as recurring calendar events.
//!
//! - `schedule`: raw spreadsheet rows and validated records
//! - `translate`: record → recurring event definition (pure)
//! - `reconcile`: purge events synced under a title prefix
//! - `sync`: batch orchestration with per-row failure isolation
//! - `gateway`: the calendar capability the core depends on
//! - `remote`: a gateway backed by a provider binary (JSON over stdin/stdout)

pub mod config;
pub mod error;
pub mod gateway;
pub mod reconcile;
pub mod recurrence;
pub mod reminder;
pub mod remote;
pub mod schedule;
pub mod sync;
pub mod translate;

pub use error::{ClassCalError, ClassCalResult, GatewayError, GatewayResult, TranslationError};
pub use gateway::{CalendarGateway, ListFilter, MemoryGateway, RemoteEvent};
pub use reconcile::{PurgeReport, Reconciler};
pub use reminder::{ReminderConfig, ReminderMethod, ReminderUnit};
pub use schedule::{RawRow, ScheduleRecord, WeekdayCell};
pub use sync::{RowPlan, SyncOptions, SyncOrchestrator, SyncReport};
pub use translate::{CalendarEventSpec, Recurrence, translate};
