#[allow(clippy::module_inception)]
pub mod core_auth;
pub mod error;
pub mod gateway;
pub mod helper;
pub mod user_store;
