//! Defines the JSON protocol used for communication between classcal
//! and provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::gateway::RemoteEvent;
use crate::translate::CalendarEventSpec;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    Connect,
    ListEvents,
    CreateEvent,
    DeleteEvent,
}

/// Request sent from classcal to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to classcal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap_or_else(|e| {
            Response::error(&format!("Failed to serialize response: {e}"))
        })
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        // A map of two strings always serializes.
        serde_json::json!({ "status": "error", "error": msg }).to_string()
    }
}

/// Run the interactive consent flow; responds with the account identifier.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String;
    fn command() -> Command {
        Command::Authenticate
    }
}

/// Check (and refresh) the stored session for a remote.
#[derive(Debug, Serialize, Deserialize)]
pub struct Connect {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for Connect {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Connect
    }
}

/// List events ordered by start time.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub max_results: u32,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<RemoteEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Create a recurring event.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event: CalendarEventSpec,
}

impl ProviderCommand for CreateEvent {
    type Response = String; // Remote event id
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Delete an event (or a whole recurring series) by ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_flattens_remote_config() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("google_account".into(), "me@example.com".into());

        let params = serde_json::to_value(DeleteEvent {
            remote_config,
            event_id: "abc123".into(),
        })
        .unwrap();
        let request = Request {
            command: DeleteEvent::command(),
            params,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "delete_event");
        assert_eq!(json["params"]["google_account"], "me@example.com");
        assert_eq!(json["params"]["event_id"], "abc123");
    }

    #[test]
    fn test_response_envelopes() {
        let ok: Response<String> =
            serde_json::from_str(&Response::success("evt-1".to_string())).unwrap();
        assert!(matches!(ok, Response::Success { data } if data == "evt-1"));

        let err: Response<String> =
            serde_json::from_str(&Response::error("quota exceeded")).unwrap();
        assert!(matches!(err, Response::Error { error } if error == "quota exceeded"));
    }

    #[test]
    fn test_unit_response_parses() {
        let ok: Response<()> = serde_json::from_str(&Response::success(())).unwrap();
        assert!(matches!(ok, Response::Success { .. }));
    }
}
