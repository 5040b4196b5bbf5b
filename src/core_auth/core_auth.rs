use crate::constants::{ADMIN_ROLE, USER_ROLE};
use crate::core_auth::error::AuthError;
use crate::core_auth::helper::{is_valid_bcrypt_hash, is_valid_username};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_ROLE,
            Role::User => USER_ROLE,
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        match role.to_ascii_lowercase().as_str() {
            ADMIN_ROLE => Ok(Role::Admin),
            USER_ROLE => Ok(Role::User),
            _ => Err(AuthError::InvalidRole(role.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated user entry. Only records that passed `from_stored` exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub permissions: BTreeSet<FtpCommand>,
}

/// On-disk shape of a user entry in `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserFile {
    #[serde(default)]
    pub users: Vec<StoredUser>,
}

impl CredentialRecord {
    /// Validates a stored entry. Entries with a malformed hash, username or
    /// role are rejected whole; unknown or non-grantable verbs are dropped.
    pub fn from_stored(stored: StoredUser) -> Option<Self> {
        if !is_valid_username(&stored.username) {
            warn!("Skipping user {:?}: invalid username.", stored.username);
            return None;
        }
        if !is_valid_bcrypt_hash(&stored.password) {
            warn!("Skipping user {}: invalid bcrypt hash.", stored.username);
            return None;
        }
        let role = match stored.role.parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                warn!(
                    "Skipping user {}: unknown role {:?}.",
                    stored.username, stored.role
                );
                return None;
            }
        };

        let mut permissions = BTreeSet::new();
        for verb in &stored.permissions {
            match verb.parse::<FtpCommand>() {
                Ok(command) if command.is_grantable() => {
                    permissions.insert(command);
                }
                _ => warn!(
                    "Ignoring permission {:?} for user {}: not a grantable command.",
                    verb, stored.username
                ),
            }
        }

        Some(Self {
            username: stored.username,
            password_hash: stored.password,
            role,
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "$2b$04$abcdefghijklmnopqrstuuJ6v8E9bS3eMxYb8w5jC0FZp6m4kI/2u";

    fn stored(username: &str, password: &str, role: &str, permissions: &[&str]) -> StoredUser {
        StoredUser {
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_valid_record() {
        assert_eq!(HASH.len(), 60);
        let record =
            CredentialRecord::from_stored(stored("alice", HASH, "user", &["ls", "RETR"])).unwrap();
        assert_eq!(record.role, Role::User);
        assert!(record.permissions.contains(&FtpCommand::Ls));
        assert!(record.permissions.contains(&FtpCommand::Retr));
    }

    #[test]
    fn test_invalid_hash_is_filtered() {
        assert!(CredentialRecord::from_stored(stored("alice", "1234", "user", &[])).is_none());
    }

    #[test]
    fn test_unknown_role_is_filtered() {
        assert!(CredentialRecord::from_stored(stored("alice", HASH, "root", &[])).is_none());
    }

    #[test]
    fn test_non_grantable_verbs_are_dropped() {
        let record =
            CredentialRecord::from_stored(stored("bob", HASH, "user", &["GRANT", "BOGUS", "CAT"]))
                .unwrap();
        assert_eq!(
            record.permissions.into_iter().collect::<Vec<_>>(),
            vec![FtpCommand::Cat]
        );
    }

    #[test]
    fn test_hyphenated_verbs_parse() {
        let record =
            CredentialRecord::from_stored(stored("bob", HASH, "user", &["RM-R", "ls-l"])).unwrap();
        assert!(record.permissions.contains(&FtpCommand::RmR));
        assert!(record.permissions.contains(&FtpCommand::LsL));
    }
}
