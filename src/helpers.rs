use crate::config::Config;
use log::info;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/jailftpd.conf";

/// Picks the configuration file: the CLI value when given, else the default.
pub fn config_path(cli_value: &str) -> &str {
    if cli_value.is_empty() {
        DEFAULT_CONFIG_PATH
    } else {
        cli_value
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!(
        "  Listen Address: {}:{}",
        config.server.listen_address, config.server.listen_port
    );
    info!("  PASV Address: {}", config.server.pasv_address);
    info!("  Chroot Directory: {}", config.server.chroot_dir);
    info!("  Users File: {}", config.server.users_file);
    info!(
        "  Upload Buffer Size: {} KB",
        config.server.upload_buffer_size / 1024
    );
    info!(
        "  Download Buffer Size: {} KB",
        config.server.download_buffer_size / 1024
    );
    info!("  CAT Limit: {} bytes", config.server.cat_limit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path() {
        assert_eq!(config_path(""), DEFAULT_CONFIG_PATH);
        assert_eq!(config_path("./dev.conf"), "./dev.conf");
    }
}
