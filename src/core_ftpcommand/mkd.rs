use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the MKDIR command. The parent directory must already exist.
///
/// # Arguments
///
/// * `session` - The connection's session, for the working directory.
/// * `ctx` - Shared server context.
/// * `args` - The directory to create.
pub async fn handle_mkdir_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Mkdir, &args, 0, "missing directory name")?;
    let dir_path = resolve_path(session, ctx, target)?;

    info!("Creating directory {:?}", dir_path);
    fs::create_dir(&dir_path).await.map_err(|e| {
        error!("Failed to create directory {:?}: {}", dir_path, e);
        FtpError::io(FtpCommand::Mkdir, target, e)
    })?;

    Ok(format!("257 \"{}\" directory created.\r\n", target))
}
