use crate::config::Config;
use crate::core_network::network;
use crate::helpers::log_config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration. Only returns on a
/// start-up failure.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config:");
    log_config(&config);

    if let Err(e) = network::start_server(Arc::new(config)).await {
        error!("Failed to start server: {:#}", e);
        return Err(e);
    }

    Ok(())
}
