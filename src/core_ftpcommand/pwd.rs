use crate::core_ftpcommand::error::FtpError;
use crate::session::Session;

pub async fn handle_pwd_command(session: &mut Session) -> Result<String, FtpError> {
    Ok(format!(
        "257 \"{}\" is the current directory.\r\n",
        session.current_dir
    ))
}
