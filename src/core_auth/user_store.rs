// JSON-backed credential store. Every mutation runs its whole
// load-modify-store cycle under one lock. Reads take no lock: saves replace
// the file by rename, so a reader sees either the old or the new content.

use crate::constants::DEFAULT_USER_PERMISSIONS;
use crate::core_auth::core_auth::{CredentialRecord, Role, StoredUser, UserFile};
use crate::core_auth::error::AuthError;
use crate::core_auth::gateway::CredentialGateway;
use crate::core_auth::helper::{hash_password, is_valid_username, verify_password};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

// Hashed lazily at the store's cost and checked when PASS names an unknown user
const UNKNOWN_USER_PASSWORD: &str = "jailftpd-unknown-user";

pub struct UserStore {
    storage_file: PathBuf,
    bcrypt_cost: u32,
    lock: Mutex<()>,
    unknown_user_hash: OnceLock<String>,
}

impl UserStore {
    pub fn new(storage_file: impl Into<PathBuf>, bcrypt_cost: u32) -> Self {
        Self {
            storage_file: storage_file.into(),
            bcrypt_cost,
            lock: Mutex::new(()),
            unknown_user_hash: OnceLock::new(),
        }
    }

    pub fn storage_file(&self) -> &Path {
        &self.storage_file
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the raw entries, including ones that would fail validation, so
    /// that a rewrite never silently discards them.
    fn load(&self) -> Result<Vec<StoredUser>, AuthError> {
        if !self.storage_file.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.storage_file)
            .map_err(|e| AuthError::StoreRead(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: UserFile =
            serde_json::from_str(&content).map_err(|e| AuthError::StoreRead(e.to_string()))?;
        Ok(file.users)
    }

    fn save(&self, users: Vec<StoredUser>) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(&UserFile { users })
            .map_err(|e| AuthError::StoreWrite(e.to_string()))?;

        if let Some(parent) = self.storage_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::StoreWrite(e.to_string()))?;
        }

        // Write next to the target and rename so readers never see a torn file
        let tmp_file = self.storage_file.with_extension("json.tmp");
        std::fs::write(&tmp_file, content).map_err(|e| AuthError::StoreWrite(e.to_string()))?;
        std::fs::rename(&tmp_file, &self.storage_file)
            .map_err(|e| AuthError::StoreWrite(e.to_string()))?;

        debug!("User store saved to {}", self.storage_file.display());
        Ok(())
    }

    /// Applies `update` to the named entry and persists the result.
    fn modify_user<F>(&self, username: &str, update: F) -> Result<(), AuthError>
    where
        F: FnOnce(&mut StoredUser) -> bool,
    {
        let _guard = self.guard();
        let mut users = self.load()?;

        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if update(user) {
            self.save(users)?;
        }
        Ok(())
    }

    fn unknown_user_hash(&self) -> &str {
        self.unknown_user_hash.get_or_init(|| {
            hash_password(UNKNOWN_USER_PASSWORD, self.bcrypt_cost).unwrap_or_else(|e| {
                error!("Failed to prepare hash for unknown users: {}", e);
                String::new()
            })
        })
    }
}

fn holds(user: &StoredUser, command: FtpCommand) -> bool {
    user.permissions
        .iter()
        .any(|verb| verb.parse::<FtpCommand>().ok() == Some(command))
}

impl CredentialGateway for UserStore {
    fn lookup(&self, username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|u| u.username == username)
            .find_map(CredentialRecord::from_stored))
    }

    fn verify(&self, record: &CredentialRecord, password: &str) -> bool {
        verify_password(password, &record.password_hash)
    }

    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        match self.lookup(username)? {
            Some(record) => Ok(self.verify(&record, password).then_some(record)),
            None => {
                verify_password(password, self.unknown_user_hash());
                Ok(None)
            }
        }
    }

    fn add_identity(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError> {
        if !is_valid_username(username) {
            return Err(AuthError::InvalidUsername(username.to_string()));
        }
        let password_hash = hash_password(password, self.bcrypt_cost)?;

        let _guard = self.guard();
        let mut users = self.load()?;
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }

        let permissions = match role {
            Role::Admin => Vec::new(),
            Role::User => DEFAULT_USER_PERMISSIONS
                .iter()
                .map(|verb| verb.to_string())
                .collect(),
        };
        users.push(StoredUser {
            username: username.to_string(),
            password: password_hash,
            role: role.to_string(),
            permissions,
        });
        self.save(users)?;

        info!("User {} added with role {}", username, role);
        Ok(())
    }

    fn remove_identity(&self, username: &str) -> Result<(), AuthError> {
        let _guard = self.guard();
        let mut users = self.load()?;
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Err(AuthError::UserNotFound(username.to_string()));
        }
        self.save(users)?;

        info!("User {} removed", username);
        Ok(())
    }

    fn set_role(&self, username: &str, role: Role) -> Result<(), AuthError> {
        self.modify_user(username, |user| {
            user.role = role.to_string();
            true
        })?;
        info!("Role for {} set to {}", username, role);
        Ok(())
    }

    fn grant_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError> {
        if !command.is_grantable() {
            return Err(AuthError::NotGrantable(command.to_string()));
        }
        self.modify_user(username, |user| {
            if holds(user, command) {
                return false;
            }
            user.permissions.push(command.to_string());
            true
        })?;
        info!("Granted {} to {}", command, username);
        Ok(())
    }

    fn revoke_permission(&self, username: &str, command: FtpCommand) -> Result<(), AuthError> {
        if !command.is_grantable() {
            return Err(AuthError::NotGrantable(command.to_string()));
        }
        self.modify_user(username, |user| {
            if !holds(user, command) {
                return false;
            }
            user.permissions
                .retain(|verb| verb.parse::<FtpCommand>().ok() != Some(command));
            true
        })?;
        info!("Revoked {} from {}", command, username);
        Ok(())
    }
}
