use anyhow::{Context, Result};
use classcal_core::remote::protocol::DeleteEvent;
use google_calendar::ClientError;
use google_calendar::types::SendUpdates;

use crate::commands::authed_client;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: DeleteEvent) -> Result<()> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    let result = client
        .events()
        .delete(
            &config.google_calendar_id,
            &cmd.event_id,
            false,
            SendUpdates::None,
        )
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(ClientError::HttpError { status, .. }) if is_already_gone(status.as_u16()) => {
            log::info!("Event {} was already deleted", cmd.event_id);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to delete event: {}", cmd.event_id)),
    }
}

/// Google answers 410 Gone for events deleted earlier (and 404 once they are purged).
fn is_already_gone(status: u16) -> bool {
    status == 404 || status == 410
}
