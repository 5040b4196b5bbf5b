// Here's the list of the commands implemented
pub mod cat;
pub mod cp;
pub mod cwd;
pub mod dele;
pub mod echo;
pub mod help;
pub mod list;
pub mod mkd;
pub mod mv;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod stat;
pub mod stor;
pub mod touch;
pub mod user;

// Admin-only store mutations
pub mod admin;

// Dispatch plumbing
pub mod dispatcher;
pub mod error;
pub mod ftpcommand;
pub mod handlers;

// The utils and common functions are here
pub mod utils;

#[cfg(test)]
pub mod testing;
