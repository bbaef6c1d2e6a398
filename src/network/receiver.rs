//! Non-blocking datagram receiver
//!
//! Each poll reads at most one datagram and never waits. Anything the
//! producer sends faster than the poll rate stays in the kernel buffer or is
//! dropped there; the receiver does not queue.

use bytes::Bytes;
use serde::Serialize;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use super::udp::create_socket;
use crate::config::NetworkConfig;
use crate::error::NetworkError;

/// Receiver statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReceiverStats {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub oversized_datagrams: u64,
    pub receive_errors: u64,
}

/// Owns the landmark socket
pub struct DatagramReceiver {
    socket: Option<UdpSocket>,
    local_addr: SocketAddr,
    /// One byte over the limit so oversized datagrams are detectable
    buffer: Vec<u8>,
    max_datagram_size: usize,
    stats: ReceiverStats,
    closed_poll_logged: bool,
}

impl DatagramReceiver {
    /// Bind the socket described by `config`
    pub fn bind(config: &NetworkConfig) -> Result<Self, NetworkError> {
        let addr = config
            .bind_addr()
            .map_err(|e| NetworkError::InvalidAddress(e.to_string()))?;
        let socket = create_socket(addr, config.recv_buffer_size)?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

        tracing::info!("Listening for landmark packets on {}", local_addr);

        Ok(Self {
            socket: Some(socket),
            local_addr,
            buffer: vec![0u8; config.max_datagram_size + 1],
            max_datagram_size: config.max_datagram_size,
            stats: ReceiverStats::default(),
            closed_poll_logged: false,
        })
    }

    /// Take one pending datagram, if any
    pub fn poll(&mut self) -> Option<Bytes> {
        let Some(socket) = self.socket.as_ref() else {
            if !self.closed_poll_logged {
                tracing::debug!("Poll on closed receiver");
                self.closed_poll_logged = true;
            }
            return None;
        };

        match socket.recv_from(&mut self.buffer) {
            Ok((len, from)) => {
                if len > self.max_datagram_size {
                    self.stats.oversized_datagrams += 1;
                    tracing::warn!(
                        "Discarded oversized datagram from {} (limit {} bytes)",
                        from,
                        self.max_datagram_size
                    );
                    return None;
                }

                self.stats.datagrams_received += 1;
                self.stats.bytes_received += len as u64;
                Some(Bytes::copy_from_slice(&self.buffer[..len]))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                self.stats.receive_errors += 1;
                tracing::warn!("UDP receive error: {}", e);
                None
            }
        }
    }

    /// Release the socket; later calls do nothing
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!("Closed landmark socket on {}", self.local_addr);
        }
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }
}

impl Drop for DatagramReceiver {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn loopback(max_datagram_size: usize) -> DatagramReceiver {
        DatagramReceiver::bind(&NetworkConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 0,
            max_datagram_size,
            recv_buffer_size: None,
        })
        .unwrap()
    }

    /// Poll until a datagram arrives; loopback delivery is not instantaneous
    fn poll_until_data(receiver: &mut DatagramReceiver) -> Option<Bytes> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(bytes) = receiver.poll() {
                return Some(bytes);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn test_poll_without_data() {
        let mut receiver = loopback(1024);
        for _ in 0..5 {
            assert!(receiver.poll().is_none());
        }
        assert_eq!(receiver.stats(), ReceiverStats::default());
    }

    #[test]
    fn test_receive_one_per_poll() {
        let mut receiver = loopback(1024);
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"first", receiver.local_addr()).unwrap();
        sender.send_to(b"second", receiver.local_addr()).unwrap();

        let first = poll_until_data(&mut receiver).unwrap();
        assert_eq!(&first[..], b"first");
        let second = poll_until_data(&mut receiver).unwrap();
        assert_eq!(&second[..], b"second");

        let stats = receiver.stats();
        assert_eq!(stats.datagrams_received, 2);
        assert_eq!(stats.bytes_received, 11);
    }

    #[test]
    fn test_oversized_discarded() {
        let mut receiver = loopback(8);
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[7u8; 32], receiver.local_addr()).unwrap();
        sender.send_to(b"ok", receiver.local_addr()).unwrap();

        let received = poll_until_data(&mut receiver).unwrap();
        assert_eq!(&received[..], b"ok");
        assert_eq!(receiver.stats().datagrams_received, 1);
        assert!(receiver.stats().oversized_datagrams + receiver.stats().receive_errors >= 1);
    }

    #[test]
    fn test_close_idempotent() {
        let mut receiver = loopback(1024);
        assert!(receiver.is_open());
        receiver.close();
        receiver.close();
        assert!(!receiver.is_open());
        assert!(receiver.poll().is_none());
        assert!(receiver.poll().is_none());
    }
}
