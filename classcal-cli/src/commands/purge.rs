use anyhow::Result;
use classcal_core::Reconciler;
use classcal_core::config::ClassCalConfig;
use classcal_core::remote::ProviderGateway;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(prefix: Option<&str>) -> Result<()> {
    let config = ClassCalConfig::load()?;
    let prefix = prefix.unwrap_or(&config.prefix);

    let spinner = tui::create_spinner("Connecting...".to_string());
    let gateway = ProviderGateway::connect(config.provider(), config.remote_config()?).await;
    spinner.finish_and_clear();
    let gateway = gateway?;

    println!("Connected as {}", gateway.account().dimmed());

    let spinner = tui::create_spinner(format!("Removing events titled {prefix}..."));
    let report = Reconciler::new(&gateway)
        .with_concurrency(config.concurrency)
        .purge(prefix)
        .await;
    spinner.finish_and_clear();
    let report = report?;

    println!("{}", report.render());

    if !report.is_complete() {
        anyhow::bail!("{} event(s) could not be removed", report.failures.len());
    }

    Ok(())
}
