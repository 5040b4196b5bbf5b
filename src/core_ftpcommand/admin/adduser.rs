use crate::core_auth::core_auth::Role;
use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::admin::helper::{ensure_admin, parse_role};
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::info;

/// Handles `ADDUSER <username> <password> [role]`. The role defaults to
/// `user`, which starts with the default permission set.
pub async fn handle_adduser_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    ensure_admin(session, FtpCommand::AddUser)?;
    let username = required_arg(FtpCommand::AddUser, &args, 0, "missing username")?;
    let password = required_arg(FtpCommand::AddUser, &args, 1, "missing password")?;
    let role = match args.get(2) {
        Some(role) => parse_role(role)?,
        None => Role::User,
    };

    let (name, secret) = (username.to_string(), password.to_string());
    blocking(&ctx.users, move |users| users.add_identity(&name, &secret, role)).await?;
    info!(
        "Admin {} added user {} with role {}",
        session.identity().unwrap_or("-"),
        username,
        role
    );
    Ok(format!("200 User {} added.\r\n", username))
}
