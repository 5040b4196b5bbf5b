use crate::core_ftpcommand::error::FtpError;

pub async fn handle_noop_command() -> Result<String, FtpError> {
    Ok("200 NOOP command successful.\r\n".to_string())
}
