// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9]{1,32}$";

/// Role exempt from per-verb permission checks.
pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// Verbs a freshly added non-admin user starts with.
pub const DEFAULT_USER_PERMISSIONS: &[&str] = &["RETR", "STOR", "LS"];

/// Longest control line accepted, terminator included.
pub const MAX_LINE: usize = 8192;

pub const DEFAULT_CAT_LIMIT: usize = 4096;
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

pub const CAT_TRUNCATED_MARKER: &str = "... (truncated)";

/// Length of a well-formed bcrypt hash string.
pub const BCRYPT_HASH_LENGTH: usize = 60;
pub const BCRYPT_PREFIXES: &[&str] = &["$2a$", "$2b$", "$2y$"];
