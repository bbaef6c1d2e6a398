//! Decoded frame types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{LANDMARKS_PER_HAND, MAX_HANDS};
use crate::skeleton::{landmarks, LandmarkId};

/// One tracked point on a hand
///
/// `x` and `y` are normalized screen coordinates in [0, 1], `z` is the
/// producer's relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: LandmarkId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(id: LandmarkId, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }
}

/// Why a hand was dropped from a frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectReason {
    #[error("invalid hand entry: {0}")]
    Invalid(String),

    #[error("expected {expected} landmarks, got {0}", expected = LANDMARKS_PER_HAND)]
    LandmarkCount(usize),

    #[error("landmark id {0} outside 0..={max}", max = LANDMARKS_PER_HAND - 1)]
    LandmarkId(i64),

    #[error("duplicate landmark id {0}")]
    DuplicateLandmark(LandmarkId),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(LandmarkId),

    #[error("hand_index {0} outside 0..={max}", max = MAX_HANDS - 1)]
    HandIndex(i64),

    #[error("hand_index {0} already present in frame")]
    DuplicateHand(u8),
}

/// A complete hand: exactly one landmark per id, ordered by id
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    hand_index: u8,
    landmarks: [Landmark; LANDMARKS_PER_HAND],
}

impl Hand {
    /// Build a hand from landmarks in any order
    pub fn new(hand_index: u8, landmarks: Vec<Landmark>) -> Result<Self, RejectReason> {
        if hand_index as usize >= MAX_HANDS {
            return Err(RejectReason::HandIndex(hand_index as i64));
        }
        if landmarks.len() != LANDMARKS_PER_HAND {
            return Err(RejectReason::LandmarkCount(landmarks.len()));
        }

        let mut slots: [Option<Landmark>; LANDMARKS_PER_HAND] = [None; LANDMARKS_PER_HAND];
        for landmark in landmarks {
            if !landmarks::is_valid(landmark.id) {
                return Err(RejectReason::LandmarkId(landmark.id as i64));
            }
            if ![landmark.x, landmark.y, landmark.z].iter().all(|c| c.is_finite()) {
                return Err(RejectReason::NonFinite(landmark.id));
            }
            let slot = &mut slots[landmark.id as usize];
            if slot.is_some() {
                return Err(RejectReason::DuplicateLandmark(landmark.id));
            }
            *slot = Some(landmark);
        }

        // 21 unique in-range ids fill every slot
        let mut ordered = [Landmark::new(0, 0.0, 0.0, 0.0); LANDMARKS_PER_HAND];
        for (target, slot) in ordered.iter_mut().zip(slots) {
            if let Some(landmark) = slot {
                *target = landmark;
            }
        }

        Ok(Self { hand_index, landmarks: ordered })
    }

    /// Build a hand from positions, assigning ids by position
    pub fn from_positions<I>(hand_index: u8, positions: I) -> Result<Self, RejectReason>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let positions: Vec<_> = positions.into_iter().collect();
        if positions.len() != LANDMARKS_PER_HAND {
            return Err(RejectReason::LandmarkCount(positions.len()));
        }

        // The count check bounds every index below LANDMARKS_PER_HAND
        let landmarks = positions
            .into_iter()
            .zip(0..)
            .map(|((x, y, z), id)| Landmark::new(id, x, y, z))
            .collect();
        Self::new(hand_index, landmarks)
    }

    /// Opaque tracking key assigned by the producer
    pub fn hand_index(&self) -> u8 {
        self.hand_index
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARKS_PER_HAND] {
        &self.landmarks
    }

    pub fn landmark(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(id as usize)
    }
}

/// All hands decoded from one datagram
///
/// Each `hand_index` appears at most once, so a frame never holds more than
/// `MAX_HANDS` hands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    hands: Vec<Hand>,
}

impl Frame {
    pub fn new(hands: Vec<Hand>) -> Result<Self, RejectReason> {
        let mut frame = Self::default();
        for hand in hands {
            frame.push(hand)?;
        }
        Ok(frame)
    }

    /// Add a hand unless its `hand_index` is already present
    pub fn push(&mut self, hand: Hand) -> Result<(), RejectReason> {
        if self.hand(hand.hand_index).is_some() {
            return Err(RejectReason::DuplicateHand(hand.hand_index));
        }
        self.hands.push(hand);
        Ok(())
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    /// Frame with no detection
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn hand(&self, hand_index: u8) -> Option<&Hand> {
        self.hands.iter().find(|h| h.hand_index == hand_index)
    }
}
