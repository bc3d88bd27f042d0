//! Google-specific remote configuration.
//!
//! classcal-core passes provider parameters as a generic JSON map; this
//! gives them a type on the provider side.

use anyhow::Result;

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleRemoteConfig {
    pub google_account: String,
    pub google_calendar_id: String,
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for GoogleRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let google_account = map
            .get("google_account")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing required field: google_account"))?
            .to_string();

        let google_calendar_id = map
            .get("google_calendar_id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CALENDAR_ID)
            .to_string();

        Ok(Self {
            google_account,
            google_calendar_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_calendar_id_defaults_to_primary() {
        let config =
            GoogleRemoteConfig::try_from(&map(json!({"google_account": "sv@example.com"})))
                .unwrap();
        assert_eq!(config.google_calendar_id, "primary");
    }

    #[test]
    fn test_account_is_required() {
        assert!(GoogleRemoteConfig::try_from(&map(json!({"google_calendar_id": "x"}))).is_err());
    }
}
