//! Landmark packet encoder
//!
//! Writes frames in the same schema the decoder reads, with explicit ids.

use bytes::Bytes;
use serde::Serialize;

use super::frame::{Frame, Landmark};
use crate::error::EncodeError;

#[derive(Serialize)]
struct WirePacket<'a> {
    hands: Vec<WireHand<'a>>,
}

#[derive(Serialize)]
struct WireHand<'a> {
    hand_index: u8,
    landmarks: &'a [Landmark],
}

impl<'a> WirePacket<'a> {
    fn from_frame(frame: &'a Frame) -> Self {
        Self {
            hands: frame
                .hands()
                .iter()
                .map(|hand| WireHand {
                    hand_index: hand.hand_index(),
                    landmarks: hand.landmarks(),
                })
                .collect(),
        }
    }
}

/// Encode a frame as a compact JSON datagram
pub fn encode(frame: &Frame) -> Result<Bytes, EncodeError> {
    serde_json::to_vec(&WirePacket::from_frame(frame))
        .map(Bytes::from)
        .map_err(|e| EncodeError::Serialize(e.to_string()))
}

/// Encode a frame as indented JSON (status output, debugging)
pub fn encode_pretty(frame: &Frame) -> Result<String, EncodeError> {
    serde_json::to_string_pretty(&WirePacket::from_frame(frame))
        .map_err(|e| EncodeError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, Hand};
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = (f64, f64, f64)> {
        (0.0f64..1.0, 0.0f64..1.0, -1.0f64..1.0)
    }

    proptest! {
        #[test]
        fn test_decode_reads_encoded_coordinates(
            first in prop::collection::vec(coordinate(), 21),
            second in prop::collection::vec(coordinate(), 21),
            hand_count in 0usize..=2,
        ) {
            let hands: Vec<Hand> = [first, second]
                .into_iter()
                .take(hand_count)
                .enumerate()
                .map(|(i, positions)| Hand::from_positions(i as u8, positions).unwrap())
                .collect();
            let frame = Frame::new(hands).unwrap();

            let bytes = encode(&frame).unwrap();
            let decoded = decode(&bytes).unwrap();

            prop_assert_eq!(decoded, frame);
        }
    }

    #[test]
    fn test_encoded_schema() {
        let positions: Vec<_> = (0..21).map(|i| (i as f64, 0.25, -0.5)).collect();
        let frame = Frame::new(vec![Hand::from_positions(1, positions).unwrap()]).unwrap();

        let bytes = encode(&frame).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["hands"][0]["hand_index"], 1);
        assert_eq!(value["hands"][0]["landmarks"].as_array().unwrap().len(), 21);
        assert_eq!(value["hands"][0]["landmarks"][4]["id"], 4);
        assert_eq!(value["hands"][0]["landmarks"][4]["y"], 0.25);
    }

    #[test]
    fn test_pretty_output() {
        let text = encode_pretty(&Frame::empty()).unwrap();
        assert!(text.contains("\"hands\": []"));
    }
}
