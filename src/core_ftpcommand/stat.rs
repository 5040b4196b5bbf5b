use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::list::mode_string;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use chrono::{DateTime, Local};
use std::fs::Metadata;
use tokio::fs;

/// Handles the STAT command: name, size, type, modification time and
/// permission bits of a file or directory.
pub async fn handle_stat_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Stat, &args, 0, "missing file operand")?;
    let path = resolve_path(session, ctx, target)?;

    let metadata = fs::symlink_metadata(&path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Stat, target, e))?;

    let modified = metadata
        .modified()
        .map(|t| {
            DateTime::<Local>::from(t)
                .format("%Y-%m-%d %H:%M:%S %z")
                .to_string()
        })
        .unwrap_or_else(|_| "-".to_string());

    let mut response = format!("213-Status of \"{}\":\r\n", target);
    response.push_str(&format!("  File: {}\r\n", ctx.jail.to_virtual(&path)));
    response.push_str(&format!("  Size: {}\r\n", metadata.len()));
    response.push_str(&format!("  Type: {}\r\n", file_type(&metadata)));
    response.push_str(&format!("  Modified: {}\r\n", modified));
    response.push_str(&format!("  Access: {}\r\n", mode_string(&metadata)));
    response.push_str("213 End of status.\r\n");
    Ok(response)
}

fn file_type(metadata: &Metadata) -> &'static str {
    if metadata.file_type().is_symlink() {
        "symbolic link"
    } else if metadata.is_dir() {
        "directory"
    } else {
        "regular file"
    }
}
