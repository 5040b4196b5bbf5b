use crate::core_auth::error::AuthError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use std::io::ErrorKind;
use thiserror::Error;

/// Failures a command can end with. None of them escape the dispatcher:
/// each one is rendered into a reply line by `to_ftp_response`.
#[derive(Error, Debug)]
pub enum FtpError {
    #[error("empty command")]
    EmptyCommand,

    #[error("command line too long")]
    LineTooLong,

    #[error("command not implemented")]
    CommandNotImplemented,

    #[error("login required")]
    LoginRequired,

    #[error("bad sequence of commands")]
    BadSequence,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("permission denied: {0}")]
    PermissionDenied(FtpCommand),

    #[error("access denied: path escapes the sandbox")]
    AccessDenied,

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: is a directory")]
    IsADirectory(String),

    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: file exists")]
    AlreadyExists(String),

    #[error("{verb}: {detail}")]
    Syntax { verb: FtpCommand, detail: String },

    #[error("data connection mode not set")]
    ModeNotSet,

    #[error("can't open data connection: {0}")]
    DataConnection(#[source] std::io::Error),

    #[error("{verb} {target}: {source}")]
    IoFailure {
        verb: FtpCommand,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl FtpError {
    pub fn syntax(verb: FtpCommand, detail: impl Into<String>) -> Self {
        FtpError::Syntax {
            verb,
            detail: detail.into(),
        }
    }

    /// Classifies a file-system error against the user-supplied target.
    pub fn io(verb: FtpCommand, target: &str, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => FtpError::NotFound(target.to_string()),
            ErrorKind::AlreadyExists => FtpError::AlreadyExists(target.to_string()),
            _ => FtpError::IoFailure {
                verb,
                target: target.to_string(),
                source,
            },
        }
    }

    pub fn to_ftp_response(&self) -> String {
        match self {
            FtpError::EmptyCommand => "500 Empty command.\r\n".to_string(),
            FtpError::LineTooLong => "500 Command line too long.\r\n".to_string(),
            FtpError::CommandNotImplemented => "502 Command not implemented.\r\n".to_string(),
            FtpError::LoginRequired => "530 Not logged in, login required.\r\n".to_string(),
            FtpError::BadSequence => {
                "503 Bad sequence of commands, login with USER first.\r\n".to_string()
            }
            FtpError::AuthenticationFailed => "530 Login incorrect.\r\n".to_string(),
            FtpError::PermissionDenied(verb) => format!("550 Permission denied: {}.\r\n", verb),
            FtpError::AccessDenied => "550 Access denied.\r\n".to_string(),
            FtpError::NotADirectory(target) => format!("550 {}: Not a directory.\r\n", target),
            FtpError::IsADirectory(target) => format!("550 {}: Is a directory.\r\n", target),
            FtpError::NotFound(target) => {
                format!("550 {}: No such file or directory.\r\n", target)
            }
            FtpError::AlreadyExists(target) => format!("550 {}: File exists.\r\n", target),
            FtpError::Syntax { verb, detail } => format!("501 {}: {}.\r\n", verb, detail),
            FtpError::ModeNotSet => "425 Use PORT or PASV first.\r\n".to_string(),
            FtpError::DataConnection(_) => "425 Can't open data connection.\r\n".to_string(),
            FtpError::IoFailure {
                verb,
                target,
                source,
            } => format!("451 {} {}: {}.\r\n", verb, target, source),
            FtpError::Auth(e) => e.to_ftp_response(),
        }
    }
}
