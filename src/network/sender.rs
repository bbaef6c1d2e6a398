//! Frame sender
//!
//! Development counterpart of the receiver: pushes encoded frames to a
//! target address, one datagram per frame.

use std::net::{SocketAddr, UdpSocket};

use super::udp::create_send_socket;
use crate::codec::{encode, Frame};
use crate::constants::MAX_DATAGRAM_SIZE;
use crate::error::{NetworkError, Result};

pub struct FrameSender {
    socket: UdpSocket,
    target: SocketAddr,
    frames_sent: u64,
    bytes_sent: u64,
}

impl FrameSender {
    pub fn new(target: SocketAddr) -> Result<Self> {
        Ok(Self {
            socket: create_send_socket(target)?,
            target,
            frames_sent: 0,
            bytes_sent: 0,
        })
    }

    /// Encode and send one frame, returning the datagram size
    pub fn send(&mut self, frame: &Frame) -> Result<usize> {
        let payload = encode(frame)?;
        if payload.len() > MAX_DATAGRAM_SIZE {
            return Err(NetworkError::DatagramTooLarge(payload.len()).into());
        }

        let sent = self
            .socket
            .send_to(&payload, self.target)
            .map_err(|e| NetworkError::SendFailed(e.to_string()))?;

        self.frames_sent += 1;
        self.bytes_sent += sent as u64;
        Ok(sent)
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}
