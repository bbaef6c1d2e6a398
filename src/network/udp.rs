//! UDP socket construction

use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use crate::error::NetworkError;

/// Create a non-blocking UDP socket bound to `addr`
///
/// Address reuse is enabled so a restarted receiver can rebind at once.
pub fn create_socket(addr: SocketAddr, recv_buffer_size: Option<usize>) -> Result<UdpSocket, NetworkError> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| NetworkError::BindFailed(format!("socket creation: {}", e)))?;

    socket
        .set_reuse_address(true)
        .map_err(|e| NetworkError::BindFailed(format!("SO_REUSEADDR: {}", e)))?;

    if let Some(size) = recv_buffer_size {
        // Not fatal: the kernel may clamp or refuse the request
        if let Err(e) = socket.set_recv_buffer_size(size) {
            tracing::warn!("Failed to set receive buffer to {} bytes: {}", size, e);
        }
    }

    socket
        .set_nonblocking(true)
        .map_err(|e| NetworkError::BindFailed(format!("non-blocking mode: {}", e)))?;

    socket
        .bind(&addr.into())
        .map_err(|e| NetworkError::BindFailed(format!("{}: {}", addr, e)))?;

    Ok(socket.into())
}

/// Create a blocking UDP socket for sending to `target`
pub fn create_send_socket(target: SocketAddr) -> Result<UdpSocket, NetworkError> {
    let local: IpAddr = if target.is_ipv4() {
        Ipv4Addr::UNSPECIFIED.into()
    } else {
        Ipv6Addr::UNSPECIFIED.into()
    };

    UdpSocket::bind(SocketAddr::new(local, 0))
        .map_err(|e| NetworkError::BindFailed(e.to_string()))
}
