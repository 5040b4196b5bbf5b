use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::session::Session;
use std::path::{Path, PathBuf};

/// Returns the argument at `index`, or a 501 naming what is missing.
pub fn required_arg<'a>(
    verb: FtpCommand,
    args: &'a [String],
    index: usize,
    missing: &str,
) -> Result<&'a str, FtpError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| FtpError::syntax(verb, missing))
}

/// Resolves a user-supplied path through the session's jail.
pub fn resolve_path(
    session: &Session,
    ctx: &ServerContext,
    requested: &str,
) -> Result<PathBuf, FtpError> {
    ctx.jail.resolve(&session.current_dir, requested)
}

/// Destructive operations on the sandbox root itself are refused.
pub fn ensure_not_root(ctx: &ServerContext, path: &Path) -> Result<(), FtpError> {
    if path == ctx.jail.root() {
        return Err(FtpError::AccessDenied);
    }
    Ok(())
}

/// `cp`/`mv` semantics: an existing directory destination receives the
/// source under its own name.
pub async fn destination_for(source: &Path, destination: PathBuf) -> PathBuf {
    let is_dir = tokio::fs::metadata(&destination)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    match (is_dir, source.file_name()) {
        (true, Some(name)) => destination.join(name),
        _ => destination,
    }
}
