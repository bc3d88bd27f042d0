use anyhow::Result;
use classcal_core::remote::protocol::Connect;

use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

/// Make sure a usable session exists for the account, refreshing it if needed.
pub async fn handle(cmd: Connect) -> Result<String> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let session = Session::load_valid(&config.google_account).await?;

    Ok(session.account_email().to_string())
}
