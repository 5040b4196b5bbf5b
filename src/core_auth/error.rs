use crate::core_ftpcommand::ftpcommand::FtpCommand;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Command cannot be granted: {0}")]
    NotGrantable(String),

    #[error("Failed to read user store: {0}")]
    StoreRead(String),

    #[error("Failed to write user store: {0}")]
    StoreWrite(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Credential store task failed: {0}")]
    Task(String),
}

impl AuthError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            AuthError::UserNotFound(user) => format!("550 User {} not found.\r\n", user),
            AuthError::UserAlreadyExists(user) => {
                format!("550 User {} already exists.\r\n", user)
            }
            AuthError::InvalidUsername(user) => format!("501 Invalid username: {}.\r\n", user),
            AuthError::InvalidRole(role) => {
                format!("501 Invalid role '{}'. Allowed: admin, user.\r\n", role)
            }
            AuthError::NotGrantable(verb) => {
                let allowed: Vec<&str> = FtpCommand::grantable().map(|c| c.as_str()).collect();
                format!(
                    "501 Invalid command '{}'. Allowed: {}.\r\n",
                    verb,
                    allowed.join(", ")
                )
            }
            _ => "451 Requested action aborted. Local error in processing.\r\n".to_string(),
        }
    }
}
