//! # Hand Pose Receiver
//!
//! Low-latency consumer for hand-landmark streams sent over UDP.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                        HAND TRACKING PROCESS (external)                  │
//! │        JSON datagrams: {"hands":[{"hand_index":0,"landmarks":[...]}]}    │
//! └──────────────────────────────────┬───────────────────────────────────────┘
//!                                    │ UDP
//!                                    ▼
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                              Session (session)                           │
//! │  ┌─────────────────────────────────────────────────────────────────────┐ │
//! │  │        Datagram Receiver (network::receiver) - non-blocking         │ │
//! │  │        at most one datagram per tick                                │ │
//! │  └──────────────────────────────┬──────────────────────────────────────┘ │
//! │                                 ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────────┐ │
//! │  │        Wire Decoder (codec::decoder) - malformed hands dropped      │ │
//! │  └──────────────────────────────┬──────────────────────────────────────┘ │
//! │                                 ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────────┐ │
//! │  │        Smoothing Engine (tracking::smoothing)                       │ │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌────────────────────┐    │ │
//! │  │   │   Projection   │  │ Joint Registry │  │   Bone Rotation    │    │ │
//! │  │   │ (math::proj.)  │  │  (last state)  │  │  (math::rotation)  │    │ │
//! │  │   └────────────────┘  └────────────────┘  └────────────────────┘    │ │
//! │  └──────────────────────────────┬──────────────────────────────────────┘ │
//! └─────────────────────────────────┼────────────────────────────────────────┘
//!                                   │ Vec<Emission>
//!                                   ▼
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                Output Sink (sink) - scene / rig adapter                  │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tick loop owns the [`session::Session`]. Anything running on another
//! thread (the status API in [`ui`]) talks to it through
//! [`protocol::ControlMessage`]s and reads a shared status snapshot.

pub mod codec;
pub mod config;
pub mod error;
pub mod math;
pub mod network;
pub mod protocol;
pub mod session;
pub mod sink;
pub mod skeleton;
pub mod tracking;
pub mod ui;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Default bind host for the landmark socket
    pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

    /// Default UDP port for landmark packets
    pub const DEFAULT_UDP_PORT: u16 = 5005;

    /// Maximum datagram size accepted by default
    pub const MAX_DATAGRAM_SIZE: usize = 65535;

    /// Default tick interval in milliseconds (~100 Hz)
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

    /// Default position smoothing factor
    pub const DEFAULT_POSITION_SMOOTHING: f64 = 0.5;

    /// Default rotation smoothing factor
    pub const DEFAULT_ROTATION_SMOOTHING: f64 = 0.5;

    /// Default depth scale for landmark projection
    pub const DEFAULT_DEPTH_SCALE: f64 = 0.5;

    /// Largest accepted depth scale
    pub const MAX_DEPTH_SCALE: f64 = 10.0;

    /// Default HTTP port for the status API
    pub const DEFAULT_HTTP_PORT: u16 = 8085;

    /// Landmarks per hand
    pub const LANDMARKS_PER_HAND: usize = 21;

    /// Hands tracked per frame
    pub const MAX_HANDS: usize = 2;
}
