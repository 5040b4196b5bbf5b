use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::resolve_path;
use crate::session::Session;
use chrono::{DateTime, Local};
use log::{error, info};
use std::fs::Metadata;
use tokio::fs;

struct Entry {
    name: String,
    metadata: Metadata,
}

/// Handles the LS command: entry names, one per line, sorted.
pub async fn handle_ls_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let entries = read_entries(session, ctx, FtpCommand::Ls, &args).await?;
    Ok(listing(entries.iter().map(|e| e.name.clone())))
}

/// Handles the NLST command: like LS, without dot-files.
pub async fn handle_nlst_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let entries = read_entries(session, ctx, FtpCommand::Nlst, &args).await?;
    Ok(listing(
        entries
            .iter()
            .filter(|e| !e.name.starts_with('.'))
            .map(|e| e.name.clone()),
    ))
}

/// Handles the LS-L command: one `ls -l` style line per entry.
pub async fn handle_ls_l_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let entries = read_entries(session, ctx, FtpCommand::LsL, &args).await?;
    Ok(listing(entries.iter().map(long_format)))
}

fn listing(lines: impl Iterator<Item = String>) -> String {
    let mut response = String::from("150 Here comes the directory listing.\r\n");
    for line in lines {
        response.push_str(&line);
        response.push_str("\r\n");
    }
    response.push_str("226 Directory send OK.\r\n");
    response
}

async fn read_entries(
    session: &Session,
    ctx: &ServerContext,
    verb: FtpCommand,
    args: &[String],
) -> Result<Vec<Entry>, FtpError> {
    let target = args.first().map(String::as_str).unwrap_or(".");
    let dir = resolve_path(session, ctx, target)?;

    let metadata = fs::metadata(&dir)
        .await
        .map_err(|e| FtpError::io(verb, target, e))?;
    if !metadata.is_dir() {
        return Err(FtpError::NotADirectory(target.to_string()));
    }

    info!("Listing directory {:?}", dir);
    let mut read_dir = fs::read_dir(&dir).await.map_err(|e| {
        error!("Failed to read directory {:?}: {}", dir, e);
        FtpError::io(verb, target, e)
    })?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| FtpError::io(verb, target, e))?
    {
        // Entries removed mid-listing are skipped
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            metadata,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn long_format(entry: &Entry) -> String {
    let modified = entry
        .metadata
        .modified()
        .map(|t| DateTime::<Local>::from(t).format("%b %d %H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string());
    format!(
        "{} {:>10} {} {}",
        mode_string(&entry.metadata),
        entry.metadata.len(),
        modified,
        entry.name
    )
}

/// `drwxr-xr-x` style type and permission string.
pub fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'l'
    } else {
        '-'
    };

    #[cfg(unix)]
    let bits = {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode()
    };
    #[cfg(not(unix))]
    let bits: u32 = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };

    let mut mode = String::with_capacity(10);
    mode.push(kind);
    for shift in [6, 3, 0] {
        let triple = (bits >> shift) & 0o7;
        mode.push(if triple & 0o4 != 0 { 'r' } else { '-' });
        mode.push(if triple & 0o2 != 0 { 'w' } else { '-' });
        mode.push(if triple & 0o1 != 0 { 'x' } else { '-' });
    }
    mode
}

#[cfg(test)]
mod tests {
    use crate::core_ftpcommand::testing::{admin_dispatcher, login, TestServer};

    #[tokio::test]
    async fn test_ls_sorted() {
        let server = TestServer::new();
        server.touch("b.txt");
        server.touch("a.txt");
        server.mkdir("c");
        let mut dispatcher = server.dispatcher();
        login(&mut dispatcher, "alice", "1234").await;

        assert_eq!(
            dispatcher.dispatch("LS").await,
            "150 Here comes the directory listing.\r\na.txt\r\nb.txt\r\nc\r\n226 Directory send OK.\r\n"
        );
    }

    #[tokio::test]
    async fn test_nlst_hides_dotfiles() {
        let server = TestServer::new();
        server.touch(".hidden");
        server.touch("visible");
        let mut dispatcher = admin_dispatcher(&server).await;

        let response = dispatcher.dispatch("NLST").await;
        assert!(response.contains("visible\r\n"));
        assert!(!response.contains(".hidden"));
        assert!(dispatcher.dispatch("LS").await.contains(".hidden\r\n"));
    }

    #[tokio::test]
    async fn test_ls_l_long_format() {
        let server = TestServer::new();
        server.write("data.bin", b"12345");
        server.mkdir("sub");
        let mut dispatcher = admin_dispatcher(&server).await;

        let response = dispatcher.dispatch("LS-L").await;
        let lines: Vec<&str> = response.split("\r\n").collect();
        assert!(lines[1].starts_with('-'), "{}", lines[1]);
        assert!(lines[1].contains(" 5 "));
        assert!(lines[1].ends_with(" data.bin"));
        assert!(lines[2].starts_with('d'));
        assert!(lines[2].ends_with(" sub"));
    }

    #[tokio::test]
    async fn test_ls_errors() {
        let server = TestServer::new();
        server.touch("file");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert_eq!(
            dispatcher.dispatch("LS file").await,
            "550 file: Not a directory.\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("LS missing").await,
            "550 missing: No such file or directory.\r\n"
        );
        assert_eq!(dispatcher.dispatch("LS ../..").await, "550 Access denied.\r\n");
    }

    #[tokio::test]
    async fn test_ls_requires_login() {
        let server = TestServer::new();
        let mut dispatcher = server.dispatcher();
        assert_eq!(
            dispatcher.dispatch("LS").await,
            "530 Not logged in, login required.\r\n"
        );
    }
}
