use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::session::Session;
use log::info;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Parses the `h1,h2,h3,h4,p1,p2` host-port encoding.
pub fn parse_host_port(arg: &str) -> Option<SocketAddrV4> {
    let parts: Vec<u8> = arg
        .split(',')
        .map(|x| x.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 6 {
        return None;
    }

    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = (parts[4] as u16) << 8 | parts[5] as u16;
    Some(SocketAddrV4::new(ip, port))
}

/// Handles the PORT (Active Mode) command. Only records the address; the
/// connection is made when a transfer starts.
pub async fn handle_port_command(
    session: &mut Session,
    _ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    let arg = args
        .first()
        .ok_or_else(|| FtpError::syntax(FtpCommand::Port, "missing host-port argument"))?;
    let addr = parse_host_port(arg)
        .ok_or_else(|| FtpError::syntax(FtpCommand::Port, "invalid host-port format"))?;

    info!("Received PORT command with address {}", addr);
    session.data_channel.set_active(SocketAddr::V4(addr));
    Ok("200 PORT command successful.\r\n".to_string())
}
