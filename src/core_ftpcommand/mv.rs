use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{destination_for, ensure_not_root, required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the MV command. An existing directory destination receives the
/// source under its own name.
pub async fn handle_mv_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let source_arg = required_arg(FtpCommand::Mv, &args, 0, "missing file operand")?;
    let dest_arg = required_arg(FtpCommand::Mv, &args, 1, "missing destination file operand")?;

    let source = resolve_path(session, ctx, source_arg)?;
    ensure_not_root(ctx, &source)?;
    let destination = resolve_path(session, ctx, dest_arg)?;

    let metadata = fs::symlink_metadata(&source)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Mv, source_arg, e))?;
    let destination = destination_for(&source, destination).await;

    if metadata.is_dir() && destination.starts_with(&source) && destination != source {
        return Err(FtpError::syntax(
            FtpCommand::Mv,
            format!("cannot move directory {} into itself", source_arg),
        ));
    }

    fs::rename(&source, &destination).await.map_err(|e| {
        error!("Failed to move {:?} to {:?}: {}", source, destination, e);
        FtpError::io(FtpCommand::Mv, dest_arg, e)
    })?;

    info!("Moved {:?} to {:?}", source, destination);
    Ok(format!(
        "250 \"{}\" moved to \"{}\".\r\n",
        source_arg, dest_arg
    ))
}
