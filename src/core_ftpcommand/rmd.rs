use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{ensure_not_root, required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the RMDIR command. Only empty directories are removed.
pub async fn handle_rmdir_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Rmdir, &args, 0, "missing directory name")?;
    let dir_path = resolve_path(session, ctx, target)?;
    ensure_not_root(ctx, &dir_path)?;

    let metadata = fs::metadata(&dir_path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Rmdir, target, e))?;
    if !metadata.is_dir() {
        return Err(FtpError::NotADirectory(target.to_string()));
    }

    fs::remove_dir(&dir_path).await.map_err(|e| {
        error!("Failed to remove directory {:?}: {}", dir_path, e);
        FtpError::io(FtpCommand::Rmdir, target, e)
    })?;

    info!("Directory removed: {:?}", dir_path);
    Ok(format!("250 \"{}\" directory removed.\r\n", target))
}

/// Handles the RM-R command: removes a directory and everything below it.
pub async fn handle_rm_r_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::RmR, &args, 0, "missing directory name")?;
    let dir_path = resolve_path(session, ctx, target)?;
    ensure_not_root(ctx, &dir_path)?;

    // symlink_metadata: a link to a directory is not followed
    let metadata = fs::symlink_metadata(&dir_path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::RmR, target, e))?;
    if !metadata.is_dir() {
        return Err(FtpError::NotADirectory(target.to_string()));
    }

    fs::remove_dir_all(&dir_path).await.map_err(|e| {
        error!("Failed to remove directory tree {:?}: {}", dir_path, e);
        FtpError::io(FtpCommand::RmR, target, e)
    })?;

    info!("Directory tree removed: {:?}", dir_path);
    Ok(format!(
        "250 \"{}\" directory and contents removed.\r\n",
        target
    ))
}
