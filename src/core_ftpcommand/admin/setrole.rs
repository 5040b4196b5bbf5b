use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::admin::helper::{ensure_admin, parse_role};
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::info;

/// Handles `SETROLE <username> <admin|user>`. Takes effect on the target
/// user's next command.
pub async fn handle_setrole_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    ensure_admin(session, FtpCommand::SetRole)?;
    let username = required_arg(FtpCommand::SetRole, &args, 0, "missing username")?;
    let role = parse_role(required_arg(FtpCommand::SetRole, &args, 1, "missing role")?)?;

    let name = username.to_string();
    blocking(&ctx.users, move |users| users.set_role(&name, role)).await?;
    info!(
        "Admin {} set role of {} to {}",
        session.identity().unwrap_or("-"),
        username,
        role
    );
    Ok(format!("200 Role for {} set to {}.\r\n", username, role))
}
