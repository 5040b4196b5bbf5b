use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::admin::helper::ensure_admin;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::required_arg;
use crate::session::Session;
use log::info;

/// Handles `DELUSER <username>`. Sessions of the removed user are logged
/// out on their next command.
pub async fn handle_deluser_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    ensure_admin(session, FtpCommand::DelUser)?;
    let username = required_arg(FtpCommand::DelUser, &args, 0, "missing username")?;

    if session.identity() == Some(username) {
        return Err(FtpError::syntax(
            FtpCommand::DelUser,
            "cannot delete the logged-in user",
        ));
    }

    let name = username.to_string();
    blocking(&ctx.users, move |users| users.remove_identity(&name)).await?;
    info!(
        "Admin {} deleted user {}",
        session.identity().unwrap_or("-"),
        username
    );
    Ok(format!("200 User {} deleted.\r\n", username))
}

#[cfg(test)]
mod tests {
    use crate::core_ftpcommand::testing::{admin_dispatcher, login, TestServer};

    #[tokio::test]
    async fn test_deleted_user_is_logged_out() {
        let server = TestServer::new();
        let mut alice = server.dispatcher();
        login(&mut alice, "alice", "1234").await;
        let mut admin = admin_dispatcher(&server).await;

        assert_eq!(
            admin.dispatch("DELUSER alice").await,
            "200 User alice deleted.\r\n"
        );
        assert_eq!(
            alice.dispatch("LS").await,
            "530 Not logged in, login required.\r\n"
        );
        assert!(!alice.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_deluser_errors() {
        let server = TestServer::new();
        let mut admin = admin_dispatcher(&server).await;

        assert_eq!(
            admin.dispatch("DELUSER ghost").await,
            "550 User ghost not found.\r\n"
        );
        assert_eq!(
            admin.dispatch("DELUSER admin").await,
            "501 DELUSER: cannot delete the logged-in user.\r\n"
        );
    }
}
