use crate::core_auth::gateway::blocking;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{CommandTable, ServerContext};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Turns command lines into replies for one connection.
///
/// The dispatcher owns the connection's `Session`; the command table and
/// server context are shared with every other connection.
pub struct Dispatcher {
    handlers: Arc<CommandTable>,
    ctx: ServerContext,
    session: Session,
}

impl Dispatcher {
    pub fn new(handlers: Arc<CommandTable>, ctx: ServerContext) -> Self {
        Self {
            handlers,
            ctx,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Set once QUIT has been processed; the connection should be closed
    /// after the reply is written.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Runs one command line and returns the reply. Never fails: every
    /// error is rendered into a reply.
    pub async fn dispatch(&mut self, line: &str) -> String {
        match self.try_dispatch(line).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Command {:?} failed: {}", redact(line), e);
                e.to_ftp_response()
            }
        }
    }

    async fn try_dispatch(&mut self, line: &str) -> Result<String, FtpError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(FtpError::EmptyCommand)?;
        let command: FtpCommand = verb.parse()?;
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let handler = self
            .handlers
            .get(&command)
            .cloned()
            .ok_or(FtpError::CommandNotImplemented)?;

        if !command.is_always_allowed() {
            if !self.session.is_authenticated() {
                return Err(FtpError::LoginRequired);
            }
            self.refresh_privileges().await?;
            if !self.session.may_invoke(command) {
                warn!(
                    "User {} denied {}",
                    self.session.identity().unwrap_or("-"),
                    command
                );
                return Err(FtpError::PermissionDenied(command));
            }
        }

        handler(&mut self.session, &self.ctx, args).await
    }

    /// Picks up role and permission changes made by an admin since login.
    /// A user removed from the store is logged out.
    async fn refresh_privileges(&mut self) -> Result<(), FtpError> {
        let Some(username) = self.session.identity().map(str::to_string) else {
            return Err(FtpError::LoginRequired);
        };

        let name = username.clone();
        match blocking(&self.ctx.users, move |users| users.lookup(&name)).await {
            Ok(Some(record)) => {
                self.session.complete_login(&record);
                Ok(())
            }
            Ok(None) => {
                info!("User {} no longer exists, ending login", username);
                self.session.fail_login();
                Err(FtpError::LoginRequired)
            }
            Err(e) => {
                // Keep the privileges granted at login
                error!("Failed to refresh privileges for {}: {}", username, e);
                Ok(())
            }
        }
    }
}

/// Hides the argument of PASS in logged command lines.
pub fn redact(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.split_whitespace().next() {
        Some(verb) if verb.eq_ignore_ascii_case("PASS") => "PASS ****".to_string(),
        _ => trimmed.to_string(),
    }
}
