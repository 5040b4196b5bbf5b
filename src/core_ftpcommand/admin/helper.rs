use crate::core_auth::core_auth::Role;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::session::Session;
use log::warn;

/// Second line of defence behind the dispatcher's permission gate.
pub fn ensure_admin(session: &Session, verb: FtpCommand) -> Result<(), FtpError> {
    if session.is_admin() {
        return Ok(());
    }
    warn!(
        "Non-admin {} attempted {}",
        session.identity().unwrap_or("-"),
        verb
    );
    Err(FtpError::PermissionDenied(verb))
}

pub fn parse_role(role: &str) -> Result<Role, FtpError> {
    Ok(role.parse::<Role>()?)
}
