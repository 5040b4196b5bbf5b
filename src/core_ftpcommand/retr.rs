use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Handles the RETR (Retrieve) command.
///
/// Sends the file over the data connection prepared by PORT or PASV. The data
/// channel is reset afterwards whether or not the transfer succeeded, so every
/// transfer needs its own PORT or PASV.
///
/// # Arguments
///
/// * `session` - The connection's session, holding the data channel.
/// * `ctx` - Shared server context; `download_buffer_size` sets the chunk size.
/// * `args` - The file to send.
pub async fn handle_retr_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Retr, &args, 0, "missing file name")?;
    if !session.data_channel.is_configured() {
        return Err(FtpError::ModeNotSet);
    }

    let result = send_file(session, ctx, target).await;
    session.data_channel.reset();
    result
}

async fn send_file(
    session: &mut Session,
    ctx: &ServerContext,
    target: &str,
) -> Result<String, FtpError> {
    let file_path = resolve_path(session, ctx, target)?;
    let mut file = open_for_reading(&file_path, target).await?;

    let mut stream = session.data_channel.open().await?;
    info!("Sending file: {:?}", file_path);

    let mut buffer = vec![0; ctx.config.server.download_buffer_size];
    let mut sent: u64 = 0;
    loop {
        let bytes_read = file
            .read(&mut buffer)
            .await
            .map_err(|e| FtpError::io(FtpCommand::Retr, target, e))?;
        if bytes_read == 0 {
            break;
        }
        stream.write_all(&buffer[..bytes_read]).await.map_err(|e| {
            error!("Error sending file to client: {}", e);
            FtpError::DataConnection(e)
        })?;
        sent += bytes_read as u64;
    }
    stream.shutdown().await.map_err(FtpError::DataConnection)?;

    info!("File transfer completed: {:?} ({} bytes)", file_path, sent);
    Ok(format!(
        "150 Opening data connection for {} ({} bytes).\r\n226 Transfer complete.\r\n",
        target, sent
    ))
}

async fn open_for_reading(path: &Path, target: &str) -> Result<File, FtpError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| FtpError::io(FtpCommand::Retr, target, e))?;
    if metadata.is_dir() {
        return Err(FtpError::IsADirectory(target.to_string()));
    }
    File::open(path).await.map_err(|e| {
        error!("File could not be opened: {:?}, error: {}", path, e);
        FtpError::io(FtpCommand::Retr, target, e)
    })
}

#[cfg(test)]
mod tests {
    use crate::core_ftpcommand::testing::{
        admin_dispatcher, grant_transfer_modes, login, pasv_address, TestServer,
    };
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpStream};

    #[tokio::test]
    async fn test_retr_passive() {
        let server = TestServer::new();
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        server.write("blob.bin", &payload);
        grant_transfer_modes(&server, "alice");
        let mut dispatcher = server.dispatcher();
        login(&mut dispatcher, "alice", "1234").await;

        let addr = pasv_address(&dispatcher.dispatch("PASV").await);
        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        let response = dispatcher.dispatch("RETR blob.bin").await;
        assert!(response.ends_with("226 Transfer complete.\r\n"), "{}", response);
        assert_eq!(client.await.unwrap(), payload);
        assert!(!dispatcher.session().data_channel.is_configured());
    }

    #[tokio::test]
    async fn test_retr_active() {
        let server = TestServer::new();
        server.write("hello.txt", b"hello over PORT");
        let mut dispatcher = admin_dispatcher(&server).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let client = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        dispatcher
            .dispatch(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xFF))
            .await;
        assert!(dispatcher
            .dispatch("RETR hello.txt")
            .await
            .starts_with("150 "));
        assert_eq!(client.await.unwrap(), b"hello over PORT");
    }

    #[tokio::test]
    async fn test_retr_without_mode() {
        let server = TestServer::new();
        server.touch("a");
        let mut dispatcher = admin_dispatcher(&server).await;
        assert_eq!(
            dispatcher.dispatch("RETR a").await,
            "425 Use PORT or PASV first.\r\n"
        );
    }

    #[tokio::test]
    async fn test_failed_retr_still_resets_channel() {
        let server = TestServer::new();
        let mut dispatcher = admin_dispatcher(&server).await;

        dispatcher.dispatch("PASV").await;
        assert_eq!(
            dispatcher.dispatch("RETR missing.bin").await,
            "550 missing.bin: No such file or directory.\r\n"
        );
        assert!(!dispatcher.session().data_channel.is_configured());
    }
}
