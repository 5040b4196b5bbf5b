use crate::config::Config;
use crate::constants::MAX_LINE;
use crate::core_auth::user_store::UserStore;
use crate::core_ftpcommand::dispatcher::{redact, Dispatcher};
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::handlers::{initialize_command_handlers, CommandTable, ServerContext};
use crate::core_jail::PathJail;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Builds the collaborators shared by every connection: the sandbox rooted
/// at `chroot_dir` and the credential store in `users_file`.
pub fn build_context(config: Arc<Config>) -> Result<ServerContext> {
    let jail = PathJail::open(&config.server.chroot_dir).with_context(|| {
        format!(
            "Sandbox root {} does not exist or is not accessible",
            config.server.chroot_dir
        )
    })?;
    info!("Sandbox root: {}", jail.root().display());

    let users = UserStore::new(&config.server.users_file, config.server.bcrypt_cost);
    info!("Credential store: {}", users.storage_file().display());

    Ok(ServerContext {
        config,
        jail: Arc::new(jail),
        users: Arc::new(users),
    })
}

pub async fn start_server(config: Arc<Config>) -> Result<()> {
    let ctx = build_context(Arc::clone(&config))?;

    let bind_addr = format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    );
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, ctx).await
}

/// Accepts connections forever, one task per client. A failed accept is
/// logged and the loop goes on.
pub async fn serve(listener: TcpListener, ctx: ServerContext) -> Result<()> {
    let handlers = Arc::new(initialize_command_handlers());

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let handlers = Arc::clone(&handlers);
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, addr, handlers, ctx).await {
                warn!("Connection error for {}: {}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Runs one control connection: greeting, then one reply per received line
/// until QUIT or end of stream.
pub async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    handlers: Arc<CommandTable>,
    ctx: ServerContext,
) -> std::io::Result<()> {
    let banner = format!("220 {}\r\n", ctx.config.server.banner);
    let mut dispatcher = Dispatcher::new(handlers, ctx);

    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    writer.write_all(banner.as_bytes()).await?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let n = (&mut reader)
            .take(MAX_LINE as u64)
            .read_until(b'\n', &mut buffer)
            .await?;
        if n == 0 {
            info!(
                "Client {} ({}) disconnected",
                addr,
                dispatcher.session().identity().unwrap_or("anonymous")
            );
            break;
        }

        if n == MAX_LINE && !buffer.ends_with(b"\n") {
            warn!("Discarding over-long command line from {}", addr);
            skip_line(&mut reader).await?;
            writer
                .write_all(FtpError::LineTooLong.to_ftp_response().as_bytes())
                .await?;
            continue;
        }

        // Undecodable bytes are replaced rather than dropping the client
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\r', '\n']);
        info!("Received command from {}: {}", addr, redact(line));

        let response = dispatcher.dispatch(line).await;
        writer.write_all(response.as_bytes()).await?;

        if dispatcher.is_closed() {
            break;
        }
    }

    writer.shutdown().await?;
    Ok(())
}

/// Consumes input up to and including the next newline, or to end of stream.
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let (found, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}
