use crate::core_ftpcommand::error::FtpError;

const HELP_LINES: &[(&str, &str)] = &[
    ("USER <username>", "Login with username"),
    ("PASS <password>", "Login with password"),
    ("QUIT", "Close the connection"),
    ("NOOP", "No operation"),
    ("HELP", "Show this help message"),
    ("PWD", "Print working directory"),
    ("CD <dir>", "Change directory"),
    ("LS [dir]", "List directory contents"),
    ("LS-L [dir]", "Long listing of directory contents"),
    ("NLST [dir]", "Name list of directory"),
    ("MKDIR <dir>", "Make directory"),
    ("RMDIR <dir>", "Remove empty directory"),
    ("RM <file>", "Remove file"),
    ("RM-R <dir>", "Remove directory and contents recursively"),
    ("CP <src> <dst>", "Copy file or directory"),
    ("MV <src> <dst>", "Move or rename file or directory"),
    ("TOUCH <file>", "Create or update file timestamp"),
    ("ECHO <text>", "Echo text to output"),
    ("ECHO <text> > <file>", "Write text to file (>> appends)"),
    ("CAT <file>", "Display file contents"),
    ("STAT <file|dir>", "Show file or directory statistics"),
    ("PORT h1,h2,h3,h4,p1,p2", "Use active mode for the next transfer"),
    ("PASV", "Use passive mode for the next transfer"),
    ("RETR <file>", "Retrieve (download) file"),
    ("STOR <file>", "Store (upload) file"),
    ("ADDUSER <user> <pass> [role]", "Add a user (admin)"),
    ("DELUSER <user>", "Delete a user (admin)"),
    ("SETROLE <user> <role>", "Set a user's role (admin)"),
    ("GRANT <user> <command>", "Grant a command to a user (admin)"),
    ("REVOKE <user> <command>", "Revoke a command from a user (admin)"),
];

pub async fn handle_help_command() -> Result<String, FtpError> {
    let mut response = String::from("214-The following commands are recognized:\r\n");
    for (usage, description) in HELP_LINES {
        response.push_str(&format!(" {:<30} - {}\r\n", usage, description));
    }
    response.push_str("214 Help OK.\r\n");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::ftpcommand::FtpCommand;

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let help = handle_help_command().await.unwrap();
        for command in FtpCommand::ALL {
            assert!(
                help.contains(&format!(" {} ", command)) || help.contains(&format!(" {}\r", command)),
                "{} missing from help",
                command
            );
        }
    }
}
