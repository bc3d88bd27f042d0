use anyhow::{Context, Result};
use classcal_core::config::ClassCalConfig;
use classcal_core::remote::provider::Provider;
use owo_colors::OwoColorize;

pub async fn run(provider_name: Option<&str>) -> Result<()> {
    let mut config = ClassCalConfig::load()?;

    if let Some(name) = provider_name {
        config.provider = name.to_string();
    }
    let provider = Provider::from_name(&config.provider);

    println!("Authenticating with {}...", provider.name());

    // The provider runs the consent flow and stores its own tokens
    let account = provider
        .authenticate()
        .await
        .context("Authentication failed")?;

    config.google_account = Some(account.clone());
    let path = ClassCalConfig::config_path()?;
    config.save(&path)?;

    println!("Authenticated as: {}", account.green());
    println!("Saved to {}\n", path.display().dimmed());
    println!("Run `classcal sync <rows.json>` to create your schedule.");

    Ok(())
}
