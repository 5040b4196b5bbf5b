// Shared fixtures for command tests: a sandbox in a temp directory and an
// in-memory credential gateway with plain-text passwords.

use crate::config::Config;
use crate::core_auth::core_auth::{CredentialRecord, Role};
use crate::core_auth::error::AuthError;
use crate::core_auth::gateway::CredentialGateway;
use crate::core_ftpcommand::dispatcher::Dispatcher;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{initialize_command_handlers, CommandTable, ServerContext};
use crate::core_jail::PathJail;
use crate::core_network::port::parse_host_port;
use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
pub struct MemoryGateway {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

impl MemoryGateway {
    pub fn insert(&self, username: &str, password: &str, role: Role, permissions: &[FtpCommand]) {
        self.records.lock().unwrap().insert(
            username.to_string(),
            CredentialRecord {
                username: username.to_string(),
                password_hash: password.to_string(),
                role,
                permissions: permissions.iter().copied().collect(),
            },
        );
    }

    pub fn remove(&self, username: &str) {
        self.records.lock().unwrap().remove(username);
    }

    pub fn promote(&self, username: &str, role: Role) {
        if let Some(record) = self.records.lock().unwrap().get_mut(username) {
            record.role = role;
        }
    }

    pub fn permissions(&self, username: &str) -> Option<BTreeSet<FtpCommand>> {
        self.records
            .lock()
            .unwrap()
            .get(username)
            .map(|r| r.permissions.clone())
    }

    pub fn role(&self, username: &str) -> Option<Role> {
        self.records.lock().unwrap().get(username).map(|r| r.role)
    }

    fn update<F>(&self, username: &str, f: F) -> Result<(), AuthError>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        f(record);
        Ok(())
    }
}

impl CredentialGateway for MemoryGateway {
    fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.records.lock().unwrap().get(username).cloned())
    }

    fn verify(&self, record: &CredentialRecord, password: &str) -> bool {
        record.password_hash == password
    }

    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self
            .lookup(username)?
            .filter(|record| self.verify(record, password)))
    }

    fn add_identity(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError> {
        if self.records.lock().unwrap().contains_key(username) {
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }
        self.insert(username, password, role, &[]);
        Ok(())
    }

    fn remove_identity(&self, username: &str) -> Result<(), AuthError> {
        self.records
            .lock()
            .unwrap()
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }

    fn set_role(&self, username: &str, role: Role) -> Result<(), AuthError> {
        self.update(username, |r| r.role = role)
    }

    fn grant_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError> {
        if !command.is_grantable() {
            return Err(AuthError::NotGrantable(command.to_string()));
        }
        self.update(username, |r| {
            r.permissions.insert(command);
        })
    }

    fn revoke_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError> {
        if !command.is_grantable() {
            return Err(AuthError::NotGrantable(command.to_string()));
        }
        self.update(username, |r| {
            r.permissions.remove(&command);
        })
    }
}

pub struct TestServer {
    pub dir: TempDir,
    pub users: Arc<MemoryGateway>,
    pub ctx: ServerContext,
    handlers: Arc<CommandTable>,
}

impl TestServer {
    /// Sandbox with `admin`/`secret` (admin role) and `alice`/`1234`
    /// (RETR, STOR, LS).
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let users = Arc::new(MemoryGateway::default());
        users.insert("admin", "secret", Role::Admin, &[]);
        users.insert(
            "alice",
            "1234",
            Role::User,
            &[FtpCommand::Retr, FtpCommand::Stor, FtpCommand::Ls],
        );

        let mut config = Config::default();
        config.server.chroot_dir = dir.path().to_string_lossy().into_owned();
        config.server.pasv_address = "127.0.0.1".to_string();

        let ctx = ServerContext {
            config: Arc::new(config),
            jail: Arc::new(PathJail::open(dir.path()).unwrap()),
            users: users.clone(),
        };

        Self {
            dir,
            users,
            ctx,
            handlers: Arc::new(initialize_command_handlers()),
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(Arc::clone(&self.handlers), self.ctx.clone())
    }

    /// Real path of a sandbox-relative file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.ctx.jail.root().join(relative)
    }

    pub fn touch(&self, relative: &str) {
        std::fs::write(self.path(relative), b"").unwrap();
    }

    pub fn write(&self, relative: &str, content: &[u8]) {
        std::fs::write(self.path(relative), content).unwrap();
    }

    pub fn mkdir(&self, relative: &str) {
        std::fs::create_dir_all(self.path(relative)).unwrap();
    }
}

/// Logs in and asserts the login succeeded.
pub async fn login(dispatcher: &mut Dispatcher, username: &str, password: &str) {
    assert_eq!(
        dispatcher.dispatch(&format!("USER {}", username)).await,
        "331 User name okay, need password.\r\n"
    );
    let response = dispatcher.dispatch(&format!("PASS {}", password)).await;
    assert!(response.starts_with("230 "), "login failed: {}", response);
}

/// Logged-in admin session: every gated verb is allowed.
pub async fn admin_dispatcher(server: &TestServer) -> Dispatcher {
    let mut dispatcher = server.dispatcher();
    login(&mut dispatcher, "admin", "secret").await;
    dispatcher
}

/// Adds PORT and PASV to a user's grants; the default set has neither.
pub fn grant_transfer_modes(server: &TestServer, username: &str) {
    server
        .users
        .grant_permission(username, FtpCommand::Pasv)
        .unwrap();
    server
        .users
        .grant_permission(username, FtpCommand::Port)
        .unwrap();
}

/// Data address announced in a `227 Entering Passive Mode (...)` reply.
pub fn pasv_address(response: &str) -> SocketAddr {
    assert!(response.starts_with("227 "), "unexpected reply: {}", response);
    let start = response.find('(').unwrap() + 1;
    let end = response.find(')').unwrap();
    SocketAddr::V4(parse_host_port(&response[start..end]).unwrap())
}
