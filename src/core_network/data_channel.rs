use crate::core_ftpcommand::error::FtpError;
use log::{debug, info};
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Default)]
pub enum DataChannelMode {
    #[default]
    Unset,
    /// PORT: the server connects out to the client at transfer time.
    Active(SocketAddr),
    /// PASV: the server accepts the client's connection at transfer time.
    Passive(TcpListener),
}

/// Per-session data connection setup. Never shared between sessions.
#[derive(Debug, Default)]
pub struct DataChannel {
    mode: DataChannelMode,
}

impl DataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn mode(&self) -> &DataChannelMode {
        &self.mode
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self.mode, DataChannelMode::Unset)
    }

    /// Records the client address; no connection is made yet. Any previous
    /// passive listener is dropped.
    pub fn set_active(&mut self, addr: SocketAddr) {
        debug!("Data channel set to active mode, target {}", addr);
        self.mode = DataChannelMode::Active(addr);
    }

    /// Binds an OS-assigned port on `bind_ip` and starts listening. Returns
    /// the bound address to report to the client.
    pub async fn set_passive(&mut self, bind_ip: IpAddr) -> std::io::Result<SocketAddr> {
        // Close the previous listener before binding a new one
        self.reset();
        let listener = TcpListener::bind((bind_ip, 0)).await?;
        let addr = listener.local_addr()?;
        debug!("Data channel listening on {}", addr);
        self.mode = DataChannelMode::Passive(listener);
        Ok(addr)
    }

    /// Produces exactly one transfer connection. The caller owns (and
    /// closes) the stream and must call `reset` afterwards.
    pub async fn open(&mut self) -> Result<TcpStream, FtpError> {
        match &self.mode {
            DataChannelMode::Active(addr) => {
                let stream = TcpStream::connect(addr)
                    .await
                    .map_err(FtpError::DataConnection)?;
                info!("Data connection established with {}", addr);
                Ok(stream)
            }
            DataChannelMode::Passive(listener) => {
                let (stream, peer) = listener.accept().await.map_err(FtpError::DataConnection)?;
                info!("Accepted data connection from {}", peer);
                Ok(stream)
            }
            DataChannelMode::Unset => Err(FtpError::ModeNotSet),
        }
    }

    /// Drops any listener and forgets the configured mode.
    pub fn reset(&mut self) {
        if self.is_configured() {
            debug!("Data channel reset");
        }
        self.mode = DataChannelMode::Unset;
    }
}
