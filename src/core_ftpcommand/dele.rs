use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the RM command. Directories are refused; use RMDIR or RM-R.
pub async fn handle_rm_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Rm, &args, 0, "missing file name")?;
    let file_path = resolve_path(session, ctx, target)?;

    let metadata = fs::symlink_metadata(&file_path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Rm, target, e))?;
    if metadata.is_dir() {
        return Err(FtpError::IsADirectory(target.to_string()));
    }

    fs::remove_file(&file_path).await.map_err(|e| {
        error!("Failed to delete file {:?}: {}", file_path, e);
        FtpError::io(FtpCommand::Rm, target, e)
    })?;

    info!("File deleted: {:?}", file_path);
    Ok(format!("250 \"{}\" removed.\r\n", target))
}
