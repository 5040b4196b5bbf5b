use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{destination_for, required_arg, resolve_path};
use crate::session::Session;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Handles the CP command.
///
/// Files are copied directly; directories are copied recursively. When the
/// destination is an existing directory the source lands inside it under its
/// own name.
///
/// # Arguments
///
/// * `session` - The connection's session.
/// * `ctx` - Shared server context.
/// * `args` - Source and destination, both resolved through the jail.
pub async fn handle_cp_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let source_arg = required_arg(FtpCommand::Cp, &args, 0, "missing file operand")?;
    let dest_arg = required_arg(FtpCommand::Cp, &args, 1, "missing destination file operand")?;

    let source = resolve_path(session, ctx, source_arg)?;
    let destination = resolve_path(session, ctx, dest_arg)?;
    let destination = destination_for(&source, destination).await;

    let metadata = fs::metadata(&source)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Cp, source_arg, e))?;
    if same_file(&source, &destination).await {
        return Err(FtpError::syntax(
            FtpCommand::Cp,
            format!("'{}' and '{}' are the same file", source_arg, dest_arg),
        ));
    }

    if metadata.is_dir() {
        if destination.starts_with(&source) {
            return Err(FtpError::syntax(
                FtpCommand::Cp,
                format!("cannot copy directory {} into itself", source_arg),
            ));
        }
        let (from, to) = (source.clone(), destination.clone());
        let copied = tokio::task::spawn_blocking(move || copy_tree(&from, &to))
            .await
            .map_err(io::Error::other)
            .and_then(|result| result)
            .map_err(|e| {
                error!("Failed to copy {:?} to {:?}: {}", source, destination, e);
                FtpError::io(FtpCommand::Cp, source_arg, e)
            })?;
        info!(
            "Copied directory {:?} to {:?} ({} files)",
            source, destination, copied
        );
    } else {
        fs::copy(&source, &destination).await.map_err(|e| {
            error!("Failed to copy {:?} to {:?}: {}", source, destination, e);
            FtpError::io(FtpCommand::Cp, dest_arg, e)
        })?;
        info!("Copied file {:?} to {:?}", source, destination);
    }

    Ok(format!(
        "250 \"{}\" copied to \"{}\".\r\n",
        source_arg, dest_arg
    ))
}

/// Copying onto the source would truncate it before it is read.
async fn same_file(source: &Path, destination: &Path) -> bool {
    if source == destination {
        return true;
    }
    match (
        fs::canonicalize(source).await,
        fs::canonicalize(destination).await,
    ) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

/// Recreates `source` at `destination`. Symbolic links are not followed
/// and not copied. Returns the number of files copied.
fn copy_tree(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut copied = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target: PathBuf = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        } else {
            warn!("Skipping {:?} during copy: not a regular file", entry.path());
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use crate::core_ftpcommand::testing::{admin_dispatcher, TestServer};

    #[tokio::test]
    async fn test_cp_file() {
        let server = TestServer::new();
        server.write("a.txt", b"alpha");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert_eq!(
            dispatcher.dispatch("CP a.txt b.txt").await,
            "250 \"a.txt\" copied to \"b.txt\".\r\n"
        );
        assert_eq!(std::fs::read(server.path("b.txt")).unwrap(), b"alpha");
        assert!(server.path("a.txt").exists());
    }

    #[tokio::test]
    async fn test_cp_into_existing_directory() {
        let server = TestServer::new();
        server.write("a.txt", b"alpha");
        server.mkdir("backup");
        let mut dispatcher = admin_dispatcher(&server).await;

        dispatcher.dispatch("CP a.txt backup").await;
        assert_eq!(std::fs::read(server.path("backup/a.txt")).unwrap(), b"alpha");
    }

    #[tokio::test]
    async fn test_cp_onto_itself_keeps_content() {
        let server = TestServer::new();
        server.write("a.txt", b"precious data");
        server.write("b.txt", b"more data");
        server.mkdir("sub");
        server.write("sub/c.txt", b"nested data");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert_eq!(
            dispatcher.dispatch("CP a.txt .").await,
            "501 CP: 'a.txt' and '.' are the same file.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP b.txt b.txt").await,
            "501 CP: 'b.txt' and 'b.txt' are the same file.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP sub/c.txt sub/../sub").await,
            "501 CP: 'sub/c.txt' and 'sub/../sub' are the same file.\r\n"
        );
        dispatcher.dispatch("CD sub").await;
        assert!(dispatcher
            .dispatch("CP c.txt /sub/c.txt")
            .await
            .starts_with("501 "));

        assert_eq!(std::fs::read(server.path("a.txt")).unwrap(), b"precious data");
        assert_eq!(std::fs::read(server.path("b.txt")).unwrap(), b"more data");
        assert_eq!(std::fs::read(server.path("sub/c.txt")).unwrap(), b"nested data");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cp_onto_symlink_to_source() {
        let server = TestServer::new();
        server.write("a.txt", b"precious data");
        std::os::unix::fs::symlink(server.path("a.txt"), server.path("link.txt")).unwrap();
        let mut dispatcher = admin_dispatcher(&server).await;

        assert!(dispatcher
            .dispatch("CP a.txt link.txt")
            .await
            .starts_with("501 "));
        assert_eq!(std::fs::read(server.path("a.txt")).unwrap(), b"precious data");
    }

    #[tokio::test]
    async fn test_cp_directory_tree() {
        let server = TestServer::new();
        server.mkdir("src/nested");
        server.write("src/nested/deep.txt", b"deep");
        server.write("src/top.txt", b"top");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert!(dispatcher.dispatch("CP src copy").await.starts_with("250 "));
        assert_eq!(std::fs::read(server.path("copy/top.txt")).unwrap(), b"top");
        assert_eq!(
            std::fs::read(server.path("copy/nested/deep.txt")).unwrap(),
            b"deep"
        );
    }

    #[tokio::test]
    async fn test_cp_errors() {
        let server = TestServer::new();
        server.mkdir("dir");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert_eq!(
            dispatcher.dispatch("CP").await,
            "501 CP: missing file operand.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP only").await,
            "501 CP: missing destination file operand.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP ghost x").await,
            "550 ghost: No such file or directory.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP dir dir/inner").await,
            "501 CP: cannot copy directory dir into itself.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("CP dir ../../escape").await,
            "550 Access denied.\r\n"
        );
    }
}
