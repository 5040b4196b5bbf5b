use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::info;

/// Handles the CD command.
///
/// The working directory only changes when the target resolves inside the
/// sandbox and is an existing directory; on any failure it is left as is.
pub async fn handle_cd_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let requested = required_arg(FtpCommand::Cd, &args, 0, "missing directory")?;
    let new_dir = ctx
        .jail
        .change_directory(&session.current_dir, requested)?;

    info!(
        "User {} changed directory from {} to {}",
        session.identity().unwrap_or("-"),
        session.current_dir,
        new_dir
    );
    session.current_dir = new_dir;
    Ok("250 Directory successfully changed.\r\n".to_string())
}
