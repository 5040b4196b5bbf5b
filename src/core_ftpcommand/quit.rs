use crate::core_ftpcommand::error::FtpError;
use crate::session::Session;
use log::info;

/// Handles the QUIT command. The connection loop closes the socket once
/// this reply has been written.
pub async fn handle_quit_command(session: &mut Session) -> Result<String, FtpError> {
    info!(
        "Received QUIT command from {}. Closing connection.",
        session.username.as_deref().unwrap_or("anonymous")
    );
    session.close();
    Ok("221 Goodbye.\r\n".to_string())
}
