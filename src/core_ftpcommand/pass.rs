use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::{AuthStage, Session};
use log::{error, info, warn};

/// Handles the PASS command. Only valid right after USER; a wrong password
/// (or an unknown user) sends the session back to anonymous.
pub async fn handle_pass_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    if session.auth_stage != AuthStage::UsernamePending {
        return Err(FtpError::BadSequence);
    }
    let password = required_arg(FtpCommand::Pass, &args, 0, "missing password")?.to_string();
    let username = session.username.clone().unwrap_or_default();

    let name = username.clone();
    let record = blocking(&ctx.users, move |users| users.authenticate(&name, &password))
        .await
        .unwrap_or_else(|e| {
            error!("Authentication error for {}: {}", username, e);
            None
        });

    match record {
        Some(record) => {
            session.complete_login(&record);
            info!("User {} logged in as {}", username, record.role);
            Ok(format!(
                "230 User {} logged in as {}, proceed.\r\n",
                username, record.role
            ))
        }
        None => {
            warn!("Failed login for user {}", username);
            session.fail_login();
            Err(FtpError::AuthenticationFailed)
        }
    }
}
