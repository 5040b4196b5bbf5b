use crate::core_ftpcommand::error::FtpError;
use std::fmt;
use std::str::FromStr;

/// Every verb the server understands on the control connection.
#[derive(Eq, Hash, PartialEq, Ord, PartialOrd, Debug, Clone, Copy)]
pub enum FtpCommand {
    User,
    Pass,
    Quit,
    Noop,
    Help,
    Pwd,
    Cd,
    Ls,
    LsL,
    Nlst,
    Mkdir,
    Rmdir,
    RmR,
    Rm,
    Cp,
    Mv,
    Touch,
    Echo,
    Cat,
    Stat,
    Retr,
    Stor,
    Port,
    Pasv,
    AddUser,
    DelUser,
    SetRole,
    Grant,
    Revoke,
}

impl FtpCommand {
    pub const ALL: [FtpCommand; 29] = [
        FtpCommand::User,
        FtpCommand::Pass,
        FtpCommand::Quit,
        FtpCommand::Noop,
        FtpCommand::Help,
        FtpCommand::Pwd,
        FtpCommand::Cd,
        FtpCommand::Ls,
        FtpCommand::LsL,
        FtpCommand::Nlst,
        FtpCommand::Mkdir,
        FtpCommand::Rmdir,
        FtpCommand::RmR,
        FtpCommand::Rm,
        FtpCommand::Cp,
        FtpCommand::Mv,
        FtpCommand::Touch,
        FtpCommand::Echo,
        FtpCommand::Cat,
        FtpCommand::Stat,
        FtpCommand::Retr,
        FtpCommand::Stor,
        FtpCommand::Port,
        FtpCommand::Pasv,
        FtpCommand::AddUser,
        FtpCommand::DelUser,
        FtpCommand::SetRole,
        FtpCommand::Grant,
        FtpCommand::Revoke,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::User => "USER",
            FtpCommand::Pass => "PASS",
            FtpCommand::Quit => "QUIT",
            FtpCommand::Noop => "NOOP",
            FtpCommand::Help => "HELP",
            FtpCommand::Pwd => "PWD",
            FtpCommand::Cd => "CD",
            FtpCommand::Ls => "LS",
            FtpCommand::LsL => "LS-L",
            FtpCommand::Nlst => "NLST",
            FtpCommand::Mkdir => "MKDIR",
            FtpCommand::Rmdir => "RMDIR",
            FtpCommand::RmR => "RM-R",
            FtpCommand::Rm => "RM",
            FtpCommand::Cp => "CP",
            FtpCommand::Mv => "MV",
            FtpCommand::Touch => "TOUCH",
            FtpCommand::Echo => "ECHO",
            FtpCommand::Cat => "CAT",
            FtpCommand::Stat => "STAT",
            FtpCommand::Retr => "RETR",
            FtpCommand::Stor => "STOR",
            FtpCommand::Port => "PORT",
            FtpCommand::Pasv => "PASV",
            FtpCommand::AddUser => "ADDUSER",
            FtpCommand::DelUser => "DELUSER",
            FtpCommand::SetRole => "SETROLE",
            FtpCommand::Grant => "GRANT",
            FtpCommand::Revoke => "REVOKE",
        }
    }

    /// Login sequence, termination and help bypass both the login and the
    /// permission check.
    pub fn is_always_allowed(&self) -> bool {
        matches!(
            self,
            FtpCommand::User | FtpCommand::Pass | FtpCommand::Quit | FtpCommand::Help
        )
    }

    /// Credential-store mutation, reserved to the admin role.
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            FtpCommand::AddUser
                | FtpCommand::DelUser
                | FtpCommand::SetRole
                | FtpCommand::Grant
                | FtpCommand::Revoke
        )
    }

    /// Verbs an admin may grant to (or revoke from) a regular user.
    pub fn is_grantable(&self) -> bool {
        !self.is_always_allowed() && !self.is_admin_only()
    }

    pub fn grantable() -> impl Iterator<Item = FtpCommand> {
        Self::ALL.into_iter().filter(FtpCommand::is_grantable)
    }
}

impl FromStr for FtpCommand {
    type Err = FtpError;

    fn from_str(cmd: &str) -> Result<Self, Self::Err> {
        let upper = cmd.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == upper)
            .ok_or(FtpError::CommandNotImplemented)
    }
}

impl fmt::Display for FtpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
