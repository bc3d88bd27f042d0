//! Gateway backed by an external provider binary.

pub mod protocol;
pub mod provider;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClassCalError, ClassCalResult, GatewayResult};
use crate::gateway::{CalendarGateway, ListFilter, RemoteEvent};
use crate::remote::protocol::{Connect, CreateEvent, DeleteEvent, ListEvents};
use crate::remote::provider::Provider;
use crate::translate::CalendarEventSpec;

/// Provider-specific parameters (e.g. `google_account`, `google_calendar_id`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RemoteConfig(pub HashMap<String, serde_json::Value>);

impl RemoteConfig {
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(key.to_string(), serde_json::Value::String(value.into()));
        self
    }
}

impl From<&RemoteConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &RemoteConfig) -> Self {
        config
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// An authenticated handle on one remote calendar, reached through a
/// provider binary.
#[derive(Debug, Clone)]
pub struct ProviderGateway {
    provider: Provider,
    config: RemoteConfig,
    account: String,
}

impl ProviderGateway {
    /// Obtain a handle, making sure the provider holds a usable session.
    ///
    /// Failing here is fatal for a sync run: there is nothing to submit to.
    pub async fn connect(provider: Provider, config: RemoteConfig) -> ClassCalResult<Self> {
        let account = provider
            .call(Connect {
                remote_config: serde_json::Map::from(&config),
            })
            .await
            .map_err(ClassCalError::Authentication)?;

        log::info!("Connected to {} as {}", provider.name(), account);

        Ok(ProviderGateway {
            provider,
            config,
            account,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }
}

impl CalendarGateway for ProviderGateway {
    async fn list_events(&self, filter: &ListFilter) -> GatewayResult<Vec<RemoteEvent>> {
        self.provider
            .call(ListEvents {
                remote_config: self.remote_config(),
                max_results: filter.max_results,
            })
            .await
    }

    async fn create_event(&self, spec: &CalendarEventSpec) -> GatewayResult<String> {
        self.provider
            .call(CreateEvent {
                remote_config: self.remote_config(),
                event: spec.clone(),
            })
            .await
    }

    async fn delete_event(&self, event_id: &str) -> GatewayResult<()> {
        self.provider
            .call(DeleteEvent {
                remote_config: self.remote_config(),
                event_id: event_id.to_string(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_config_flattens_to_json_map() {
        let config = RemoteConfig::default()
            .with("google_account", "me@example.com")
            .with("google_calendar_id", "primary");

        let map = serde_json::Map::from(&config);
        assert_eq!(map["google_account"], "me@example.com");
        assert_eq!(map["google_calendar_id"], "primary");
    }

    #[tokio::test]
    async fn test_connect_failure_is_authentication_error() {
        let err = ProviderGateway::connect(
            Provider::from_name("does-not-exist-anywhere"),
            RemoteConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClassCalError::Authentication(_)));
    }
}
