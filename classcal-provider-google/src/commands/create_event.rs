use anyhow::{Context, Result};
use classcal_core::remote::protocol::CreateEvent;
use google_calendar::types::SendUpdates;

use crate::commands::authed_client;
use crate::convert::ToGoogle;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: CreateEvent) -> Result<String> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    let google_event = cmd.event.to_google()?;

    let response = client
        .events()
        .insert(
            &config.google_calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

    log::info!("Created {} ({})", response.body.summary, response.body.id);

    Ok(response.body.id)
}
