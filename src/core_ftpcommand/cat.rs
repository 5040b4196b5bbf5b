use crate::constants::CAT_TRUNCATED_MARKER;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

/// Handles the CAT command: shows up to `cat_limit` bytes of a file on the
/// control connection, followed by a marker when the file is longer.
pub async fn handle_cat_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Cat, &args, 0, "missing file operand")?;
    let file_path = resolve_path(session, ctx, target)?;

    let metadata = fs::metadata(&file_path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Cat, target, e))?;
    if metadata.is_dir() {
        return Err(FtpError::IsADirectory(target.to_string()));
    }

    let limit = ctx.config.server.cat_limit;
    let file = File::open(&file_path).await.map_err(|e| {
        error!("Failed to open {:?}: {}", file_path, e);
        FtpError::io(FtpCommand::Cat, target, e)
    })?;

    // One byte past the limit tells a full file from a truncated one
    let mut buffer = Vec::with_capacity(limit + 1);
    file.take(limit as u64 + 1)
        .read_to_end(&mut buffer)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Cat, target, e))?;

    let truncated = buffer.len() > limit;
    buffer.truncate(limit);
    let mut data = String::from_utf8_lossy(&buffer).into_owned();
    if truncated {
        data.push('\n');
        data.push_str(CAT_TRUNCATED_MARKER);
    }

    info!("Displayed {} bytes of {:?}", buffer.len(), file_path);
    Ok(format!(
        "150 Opening file.\r\n{}\r\n226 File display complete.\r\n",
        data
    ))
}
