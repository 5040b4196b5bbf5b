use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use filetime::{set_file_mtime, FileTime};
use log::{error, info};
use std::io::{self, ErrorKind};
use tokio::fs::{self, OpenOptions};

/// Handles the TOUCH command: creates an empty file, or sets the
/// modification time of an existing one to now.
pub async fn handle_touch_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Touch, &args, 0, "missing file operand")?;
    let file_path = resolve_path(session, ctx, target)?;

    match fs::metadata(&file_path).await {
        Ok(_) => {
            let path = file_path.clone();
            tokio::task::spawn_blocking(move || set_file_mtime(&path, FileTime::now()))
                .await
                .map_err(io::Error::other)
                .and_then(|result| result)
                .map_err(|e| {
                    error!("Failed to update timestamp of {:?}: {}", file_path, e);
                    FtpError::io(FtpCommand::Touch, target, e)
                })?;
            info!("Updated timestamp of {:?}", file_path);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file_path)
                .await
                .map_err(|e| FtpError::io(FtpCommand::Touch, target, e))?;
            info!("Created empty file {:?}", file_path);
        }
        Err(e) => return Err(FtpError::io(FtpCommand::Touch, target, e)),
    }

    Ok(format!("250 \"{}\" touched.\r\n", target))
}
