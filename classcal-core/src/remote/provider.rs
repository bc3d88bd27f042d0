//! Provider subprocess transport.
//!
//! Each request spawns the provider binary (e.g. `classcal-provider-google`),
//! writes one JSON line to its stdin and reads one JSON response from its
//! stdout. Providers manage their own credentials and tokens.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{GatewayError, GatewayResult};
use crate::remote::protocol::{Authenticate, Command, ProviderCommand, Request, Response};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
/// Consent flows wait on the user's browser.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("classcal-provider-{}", self.0)
    }

    fn binary_path(&self) -> GatewayResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| {
            GatewayError::ProviderNotInstalled(format!(
                "{binary_name} (install it with: cargo install {binary_name})"
            ))
        })
    }

    /// Run the provider's interactive consent flow.
    pub async fn authenticate(&self) -> GatewayResult<String> {
        self.call_with_timeout(AUTH_TIMEOUT, Authenticate::default())
            .await
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> GatewayResult<C::Response> {
        self.call_with_timeout(PROVIDER_TIMEOUT, cmd).await
    }

    async fn call_with_timeout<C: ProviderCommand>(
        &self,
        limit: Duration,
        cmd: C,
    ) -> GatewayResult<C::Response> {
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| GatewayError::Timeout(limit.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> GatewayResult<R> {
        let request = Request {
            command,
            params: serde_json::to_value(params)?,
        };
        let request_json = serde_json::to_string(&request)?;

        let binary_path = self.binary_path()?;
        log::debug!("{} <- {:?}", binary_path.display(), command);

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::Transport(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GatewayError::Transport("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(GatewayError::Transport(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_response<R: serde::de::DeserializeOwned>(raw: &str) -> GatewayResult<R> {
    let line = raw.lines().find(|l| !l.trim().is_empty()).ok_or_else(|| {
        GatewayError::Transport("Provider returned no response".into())
    })?;

    match serde_json::from_str::<Response<R>>(line)? {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(GatewayError::Provider(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RemoteEvent;

    #[test]
    fn test_binary_name_follows_provider_convention() {
        assert_eq!(
            Provider::from_name("google").binary_name(),
            "classcal-provider-google"
        );
    }

    #[test]
    fn test_parse_response_success_and_error() {
        let events: Vec<RemoteEvent> = parse_response(
            "{\"status\":\"success\",\"data\":[{\"id\":\"e1\",\"title\":\"[TKB] Toán\"}]}\n",
        )
        .unwrap();
        assert_eq!(events[0].title, "[TKB] Toán");
        assert_eq!(events[0].series_id, None);

        let err = parse_response::<String>("{\"status\":\"error\",\"error\":\"invalid_grant\"}")
            .unwrap_err();
        assert_eq!(err, GatewayError::Provider("invalid_grant".into()));
    }

    #[test]
    fn test_parse_response_rejects_empty_output() {
        assert!(matches!(
            parse_response::<String>("\n"),
            Err(GatewayError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_provider_binary() {
        let provider = Provider::from_name("does-not-exist-anywhere");
        let err = provider.call(Authenticate::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::ProviderNotInstalled(_)));
    }
}
