use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::{required_arg, resolve_path};
use crate::session::Session;
use log::{error, info};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Handles the STOR (Store File) command.
///
/// Reads from the data connection until the client closes it and writes
/// everything to the target file, replacing any previous content. The data
/// channel is reset afterwards, as for RETR.
pub async fn handle_stor_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let target = required_arg(FtpCommand::Stor, &args, 0, "missing file name")?;
    if !session.data_channel.is_configured() {
        return Err(FtpError::ModeNotSet);
    }

    let result = receive_file(session, ctx, target).await;
    session.data_channel.reset();
    result
}

async fn receive_file(
    session: &mut Session,
    ctx: &ServerContext,
    target: &str,
) -> Result<String, FtpError> {
    let file_path = resolve_path(session, ctx, target)?;
    if fs::metadata(&file_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(FtpError::IsADirectory(target.to_string()));
    }

    let mut stream = session.data_channel.open().await?;
    let mut file = File::create(&file_path).await.map_err(|e| {
        error!("Failed to create file {:?}: {}", file_path, e);
        FtpError::io(FtpCommand::Stor, target, e)
    })?;
    info!("Receiving file: {:?}", file_path);

    let mut buffer = vec![0; ctx.config.server.upload_buffer_size];
    let mut received: u64 = 0;
    loop {
        let bytes_read = stream.read(&mut buffer).await.map_err(|e| {
            error!("Error reading from data connection: {}", e);
            FtpError::DataConnection(e)
        })?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .await
            .map_err(|e| FtpError::io(FtpCommand::Stor, target, e))?;
        received += bytes_read as u64;
    }
    file.flush()
        .await
        .map_err(|e| FtpError::io(FtpCommand::Stor, target, e))?;

    info!("File stored: {:?} ({} bytes)", file_path, received);
    Ok(format!(
        "150 Ok to send data for {}.\r\n226 Transfer complete ({} bytes received).\r\n",
        target, received
    ))
}
