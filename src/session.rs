use crate::core_auth::core_auth::{CredentialRecord, Role};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_network::data_channel::DataChannel;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Anonymous,
    UsernamePending,
    Authenticated,
    Closed,
}

/// State of one control connection. Owned by its connection task.
#[derive(Debug)]
pub struct Session {
    pub current_dir: String,      // Sandbox-relative, always starts with '/'
    pub username: Option<String>, // Name given by USER, kept through PASS
    pub auth_stage: AuthStage,
    pub role: Option<Role>,
    pub permissions: BTreeSet<FtpCommand>,
    pub data_channel: DataChannel,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_dir: String::from("/"),
            username: None,
            auth_stage: AuthStage::Anonymous,
            role: None,
            permissions: BTreeSet::new(),
            data_channel: DataChannel::new(),
        }
    }

    /// The authenticated user, if PASS has succeeded.
    pub fn identity(&self) -> Option<&str> {
        match self.auth_stage {
            AuthStage::Authenticated => self.username.as_deref(),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_stage == AuthStage::Authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.role == Some(Role::Admin)
    }

    pub fn is_closed(&self) -> bool {
        self.auth_stage == AuthStage::Closed
    }

    /// Admins may run every verb; everyone else only what was granted.
    pub fn may_invoke(&self, command: FtpCommand) -> bool {
        self.is_admin() || self.permissions.contains(&command)
    }

    /// USER always restarts the login sequence from scratch.
    pub fn begin_login(&mut self, username: &str) {
        self.username = Some(username.to_string());
        self.auth_stage = AuthStage::UsernamePending;
        self.role = None;
        self.permissions.clear();
        self.current_dir = String::from("/");
        self.data_channel.reset();
    }

    pub fn complete_login(&mut self, record: &CredentialRecord) {
        self.auth_stage = AuthStage::Authenticated;
        self.role = Some(record.role);
        self.permissions = record.permissions.clone();
    }

    /// A failed PASS drops back to anonymous; the client must send USER again.
    pub fn fail_login(&mut self) {
        self.auth_stage = AuthStage::Anonymous;
        self.username = None;
        self.role = None;
        self.permissions.clear();
    }

    pub fn close(&mut self) {
        self.auth_stage = AuthStage::Closed;
        self.data_channel.reset();
    }
}
