mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_ftpcommand;
mod core_jail;
mod core_network;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::core_auth::helper::hash_password;
use crate::core_cli::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format; RUST_LOG still wins
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let config_path = helpers::config_path(&args.config);

    if let Some(password) = args.hash_password {
        // Without a readable configuration the bcrypt default cost is used
        let cost = Config::load_from_file(config_path)
            .map(|c| c.server.bcrypt_cost)
            .unwrap_or(bcrypt::DEFAULT_COST);
        let hash = hash_password(&password, cost).context("Failed to hash password")?;
        println!("{}", hash);
        return Ok(());
    }

    let mut config = Config::load_from_file(config_path)?;

    // Override the listen port from CLI if provided
    if let Some(port) = args.port {
        info!("Listen port overridden from command line: {}", port);
        config.server.listen_port = port;
    }

    server::run(config).await
}
