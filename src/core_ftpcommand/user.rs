use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::{error, info};

/// Handles the USER command.
///
/// Always restarts the login sequence: whatever the session held before
/// (role, permissions, working directory, data channel) is dropped. The reply
/// is the same for known and unknown names; PASS is where a bad login fails.
///
/// # Arguments
///
/// * `session` - The connection's session.
/// * `ctx` - Shared server context, used to look the name up.
/// * `args` - The username as first argument.
pub async fn handle_user_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    if session.is_closed() {
        return Err(FtpError::BadSequence);
    }
    let username = required_arg(FtpCommand::User, &args, 0, "missing username")?;

    info!("Received USER command with username: {}", username);
    session.begin_login(username);

    let name = username.to_string();
    match blocking(&ctx.users, move |users| users.lookup(&name)).await {
        Ok(Some(_)) => info!("Username accepted: {}", username),
        Ok(None) => info!("Unknown username {}, PASS will be refused", username),
        Err(e) => error!("Failed to look up user {}: {}", username, e),
    }

    Ok("331 User name okay, need password.\r\n".to_string())
}
