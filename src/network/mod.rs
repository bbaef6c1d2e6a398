//! Network subsystem for UDP landmark transport

pub mod receiver;
pub mod sender;
pub mod udp;

pub use receiver::{DatagramReceiver, ReceiverStats};
pub use sender::FrameSender;
pub use udp::{create_send_socket, create_socket};
