use crate::core_auth::core_auth::{CredentialRecord, Role};
use crate::core_auth::error::AuthError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use std::sync::Arc;

/// Everything the command layer needs from the credential store.
///
/// Implementations are shared by every connection, so each mutating call
/// must be atomic with respect to the others. Calls may block on file I/O
/// or password hashing; async code goes through [`blocking`].
pub trait CredentialGateway: Send + Sync {
    fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError>;

    fn verify(&self, record: &CredentialRecord, password: &str) -> bool;

    /// Returns the record only when the password matches. An unknown user
    /// takes as long to refuse as a wrong password.
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<CredentialRecord>, AuthError>;

    fn add_identity(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError>;

    fn remove_identity(&self, username: &str) -> Result<(), AuthError>;

    fn set_role(&self, username: &str, role: Role) -> Result<(), AuthError>;

    /// Granting a verb the user already holds is a no-op.
    fn grant_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError>;

    /// Revoking a verb the user does not hold is a no-op.
    fn revoke_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError>;
}

/// Runs `call` against the gateway on tokio's blocking pool.
pub async fn blocking<T, F>(users: &Arc<dyn CredentialGateway>, call: F) -> Result<T, AuthError>
where
    F: FnOnce(&dyn CredentialGateway) -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    let users = Arc::clone(users);
    tokio::task::spawn_blocking(move || call(users.as_ref()))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))?
}
