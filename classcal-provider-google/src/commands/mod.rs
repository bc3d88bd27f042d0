pub mod authenticate;
pub mod connect;
pub mod create_event;
pub mod delete_event;
pub mod list_events;

use anyhow::Result;
use google_calendar::Client;

use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

/// An API client for the configured account, with a fresh access token.
pub async fn authed_client(config: &GoogleRemoteConfig) -> Result<Client> {
    Session::load_valid(&config.google_account).await?.client()
}
