use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::session::Session;
use log::{debug, error};
use std::net::{IpAddr, SocketAddr};

/// Formats an IPv4 address as `h1,h2,h3,h4,p1,p2`.
pub fn encode_host_port(addr: SocketAddr) -> Option<String> {
    match addr {
        SocketAddr::V4(v4) => {
            let [h1, h2, h3, h4] = v4.ip().octets();
            Some(format!(
                "{},{},{},{},{},{}",
                h1,
                h2,
                h3,
                h4,
                v4.port() >> 8,
                v4.port() & 0xFF
            ))
        }
        SocketAddr::V6(_) => None,
    }
}

/// Handles the PASV command: opens the listener now, accepts at transfer time.
pub async fn handle_pasv_command(
    session: &mut Session,
    ctx: &ServerContext,
    _args: Vec<String>,
) -> Result<String, FtpError> {
    let pasv_ip: IpAddr = ctx.config.server.pasv_address.parse().map_err(|_| {
        error!(
            "Configured pasv_address is not an IP address: {}",
            ctx.config.server.pasv_address
        );
        FtpError::syntax(FtpCommand::Pasv, "passive mode unavailable")
    })?;

    let addr = session
        .data_channel
        .set_passive(pasv_ip)
        .await
        .map_err(FtpError::DataConnection)?;

    let Some(encoded) = encode_host_port(addr) else {
        session.data_channel.reset();
        return Err(FtpError::syntax(
            FtpCommand::Pasv,
            "passive mode requires an IPv4 address",
        ));
    };

    debug!("PASV listener set up on {}", addr);
    Ok(format!("227 Entering Passive Mode ({}).\r\n", encoded))
}
