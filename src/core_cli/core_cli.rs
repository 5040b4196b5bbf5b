use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "jailftpd", about = "A sandboxed multi-user FTP server.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Listen port, overrides `listen_port` from the configuration
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a bcrypt hash of the given password for the users file, then exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}
