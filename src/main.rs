use std::sync::Arc;

use anyhow::{Context, Result};
use travelhub::{SearchService, TravelHubConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = TravelHubConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging).context("Failed to initialise logging")?;

    tracing::info!("Starting TravelHub v{}", travelhub::VERSION);
    let search = SearchService::from_config(&config.providers)
        .context("Failed to build provider clients")?;

    web::run(&config.server, Arc::new(search))
        .await
        .context("Web server failed")?;
    Ok(())
}
