//! Landmark packet decoder
//!
//! Parses one UTF-8 JSON datagram into a [`Frame`]. A hand that fails
//! validation is dropped on its own; only a datagram that cannot be read at
//! all is an error.

use serde::Deserialize;
use serde_json::Value;

use super::frame::{Frame, Hand, Landmark, RejectReason};
use crate::constants::LANDMARKS_PER_HAND;
use crate::error::DecodeError;
use crate::skeleton::LandmarkId;

#[derive(Deserialize)]
struct WireHand {
    hand_index: i64,
    landmarks: Vec<WireLandmark>,
}

#[derive(Deserialize)]
struct WireLandmark {
    #[serde(default)]
    id: Option<i64>,
    x: f64,
    y: f64,
    z: f64,
}

/// A hand entry that was dropped while decoding
#[derive(Debug, Clone, PartialEq)]
pub struct HandRejection {
    /// Position of the entry in the `hands` array
    pub position: usize,
    pub reason: RejectReason,
}

/// Decoded frame plus the hands that were dropped from it
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    pub frame: Frame,
    pub rejected: Vec<HandRejection>,
}

/// Decode a datagram, logging any dropped hands
pub fn decode(bytes: &[u8]) -> Result<Frame, DecodeError> {
    let report = decode_with_report(bytes)?;
    for rejection in &report.rejected {
        tracing::warn!(
            "Dropped hand entry {}: {}",
            rejection.position,
            rejection.reason
        );
    }
    Ok(report.frame)
}

/// Decode a datagram and return the rejected hands alongside the frame
pub fn decode_with_report(bytes: &[u8]) -> Result<DecodeReport, DecodeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::Malformed(format!("invalid UTF-8: {}", e)))?;

    let mut packet: Value = serde_json::from_str(text)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let entries = match packet.get_mut("hands").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(DecodeError::Malformed("\"hands\" is not an array".into())),
        None => return Err(DecodeError::Malformed("missing \"hands\" array".into())),
    };

    let mut report = DecodeReport::default();
    for (position, entry) in entries.into_iter().enumerate() {
        // hand_index is bounded by MAX_HANDS, so rejecting repeats caps the frame
        let result = decode_hand(entry).and_then(|hand| report.frame.push(hand));
        if let Err(reason) = result {
            report.rejected.push(HandRejection { position, reason });
        }
    }

    Ok(report)
}

fn decode_hand(entry: Value) -> Result<Hand, RejectReason> {
    let wire: WireHand =
        serde_json::from_value(entry).map_err(|e| RejectReason::Invalid(e.to_string()))?;

    let hand_index = u8::try_from(wire.hand_index)
        .map_err(|_| RejectReason::HandIndex(wire.hand_index))?;

    if wire.landmarks.len() != LANDMARKS_PER_HAND {
        return Err(RejectReason::LandmarkCount(wire.landmarks.len()));
    }

    let mut landmarks = Vec::with_capacity(LANDMARKS_PER_HAND);
    for (position, lm) in wire.landmarks.into_iter().enumerate() {
        // Array order is the id unless the producer sends one explicitly
        let raw_id = lm.id.unwrap_or(position as i64);
        let id = LandmarkId::try_from(raw_id).map_err(|_| RejectReason::LandmarkId(raw_id))?;
        landmarks.push(Landmark::new(id, lm.x, lm.y, lm.z));
    }

    Hand::new(hand_index, landmarks)
}
