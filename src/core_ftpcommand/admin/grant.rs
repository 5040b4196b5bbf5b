use crate::core_auth::error::AuthError;
use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::admin::helper::ensure_admin;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::info;

/// Parses the verb argument of GRANT/REVOKE. Unknown verbs are reported
/// the same way as ungrantable ones.
fn parse_verb(verb: &str) -> Result<FtpCommand, FtpError> {
    verb.parse::<FtpCommand>()
        .map_err(|_| AuthError::NotGrantable(verb.to_ascii_uppercase()).into())
}

/// Handles `GRANT <username> <verb>`.
pub async fn handle_grant_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    ensure_admin(session, FtpCommand::Grant)?;
    let username = required_arg(FtpCommand::Grant, &args, 0, "missing username")?;
    let verb = parse_verb(required_arg(FtpCommand::Grant, &args, 1, "missing command")?)?;

    let name = username.to_string();
    blocking(&ctx.users, move |users| users.grant_permission(&name, verb)).await?;
    info!(
        "Admin {} granted {} to {}",
        session.identity().unwrap_or("-"),
        verb,
        username
    );
    Ok(format!("200 Granted {} to {}.\r\n", verb, username))
}

/// Handles `REVOKE <username> <verb>`.
pub async fn handle_revoke_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    ensure_admin(session, FtpCommand::Revoke)?;
    let username = required_arg(FtpCommand::Revoke, &args, 0, "missing username")?;
    let verb = parse_verb(required_arg(FtpCommand::Revoke, &args, 1, "missing command")?)?;

    let name = username.to_string();
    blocking(&ctx.users, move |users| users.revoke_permission(&name, verb)).await?;
    info!(
        "Admin {} revoked {} from {}",
        session.identity().unwrap_or("-"),
        verb,
        username
    );
    Ok(format!("200 Revoked {} from {}.\r\n", verb, username))
}
