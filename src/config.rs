use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_CAT_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: String, // Address reported (and bound) for PASV
    pub chroot_dir: String,   // Sandbox root shared by every session
    pub users_file: String,
    pub banner: String,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
    pub cat_limit: usize,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: 21,
            pasv_address: String::from("127.0.0.1"),
            chroot_dir: String::from("/var/ftp"),
            users_file: String::from("/etc/jailftpd/users.json"),
            banner: String::from("Welcome to jailftpd"),
            upload_buffer_size: DEFAULT_BUFFER_SIZE,
            download_buffer_size: DEFAULT_BUFFER_SIZE,
            cat_limit: DEFAULT_CAT_LIMIT,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Zero-sized buffers would stall every transfer
        if config.server.upload_buffer_size == 0 {
            config.server.upload_buffer_size = DEFAULT_BUFFER_SIZE;
        }
        if config.server.download_buffer_size == 0 {
            config.server.download_buffer_size = DEFAULT_BUFFER_SIZE;
        }

        Ok(config)
    }
}
