//! Control and status messages
//!
//! Shared between the tick loop and anything that observes or steers it
//! from another thread (the status API).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::network::ReceiverStats;
use crate::tracking::{Emission, SmoothingConfig};

/// Commands delivered to the tick loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Drop all smoothing state
    Reset,

    /// Change smoothing factors; omitted values are kept
    SetSmoothing {
        #[serde(default)]
        position: Option<f64>,
        #[serde(default)]
        rotation: Option<f64>,
    },

    SetDepthScale { depth_scale: f64 },

    /// Move the projection reference camera; rotation is `[w, x, y, z]`
    SetCamera { position: [f64; 3], rotation: [f64; 4] },
}

/// Tick loop counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub frames_decoded: u64,
    pub decode_errors: u64,
    pub hands_rejected: u64,
    pub emissions: u64,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    pub running: bool,
    pub local_addr: Option<String>,
    pub stats: SessionStats,
    pub receiver: ReceiverStats,
    pub tracked_entities: usize,
    pub tracked_hands: Vec<u8>,
    pub smoothing: SmoothingConfig,
    pub depth_scale: f64,
    pub last_frame_at: Option<DateTime<Utc>>,
    /// Text of the last datagram that decoded
    pub last_packet: Option<String>,
    pub last_emissions: Vec<Emission>,
}

/// Snapshot shared between the tick loop and readers
pub type SharedStatus = Arc<RwLock<StatusSnapshot>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_message_json() {
        let reset: ControlMessage = serde_json::from_str(r#"{"type":"reset"}"#).unwrap();
        assert_eq!(reset, ControlMessage::Reset);

        let smoothing: ControlMessage =
            serde_json::from_str(r#"{"type":"set_smoothing","rotation":0.9}"#).unwrap();
        assert_eq!(
            smoothing,
            ControlMessage::SetSmoothing { position: None, rotation: Some(0.9) }
        );

        let depth = serde_json::to_value(ControlMessage::SetDepthScale { depth_scale: 2.0 }).unwrap();
        assert_eq!(depth, serde_json::json!({"type": "set_depth_scale", "depth_scale": 2.0}));
    }
}
