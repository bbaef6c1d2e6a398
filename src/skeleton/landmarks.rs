//! Landmark ids and names

use crate::constants::LANDMARKS_PER_HAND;

/// Landmark id within a hand (0..=20)
pub type LandmarkId = u8;

pub const WRIST: LandmarkId = 0;
pub const THUMB_CMC: LandmarkId = 1;
pub const THUMB_MCP: LandmarkId = 2;
pub const THUMB_IP: LandmarkId = 3;
pub const THUMB_TIP: LandmarkId = 4;
pub const INDEX_FINGER_MCP: LandmarkId = 5;
pub const INDEX_FINGER_PIP: LandmarkId = 6;
pub const INDEX_FINGER_DIP: LandmarkId = 7;
pub const INDEX_FINGER_TIP: LandmarkId = 8;
pub const MIDDLE_FINGER_MCP: LandmarkId = 9;
pub const MIDDLE_FINGER_PIP: LandmarkId = 10;
pub const MIDDLE_FINGER_DIP: LandmarkId = 11;
pub const MIDDLE_FINGER_TIP: LandmarkId = 12;
pub const RING_FINGER_MCP: LandmarkId = 13;
pub const RING_FINGER_PIP: LandmarkId = 14;
pub const RING_FINGER_DIP: LandmarkId = 15;
pub const RING_FINGER_TIP: LandmarkId = 16;
pub const PINKY_MCP: LandmarkId = 17;
pub const PINKY_PIP: LandmarkId = 18;
pub const PINKY_DIP: LandmarkId = 19;
pub const PINKY_TIP: LandmarkId = 20;

/// Anatomical names indexed by landmark id
pub const LANDMARK_NAMES: [&str; LANDMARKS_PER_HAND] = [
    "WRIST",
    "THUMB_CMC",
    "THUMB_MCP",
    "THUMB_IP",
    "THUMB_TIP",
    "INDEX_FINGER_MCP",
    "INDEX_FINGER_PIP",
    "INDEX_FINGER_DIP",
    "INDEX_FINGER_TIP",
    "MIDDLE_FINGER_MCP",
    "MIDDLE_FINGER_PIP",
    "MIDDLE_FINGER_DIP",
    "MIDDLE_FINGER_TIP",
    "RING_FINGER_MCP",
    "RING_FINGER_PIP",
    "RING_FINGER_DIP",
    "RING_FINGER_TIP",
    "PINKY_MCP",
    "PINKY_PIP",
    "PINKY_DIP",
    "PINKY_TIP",
];

/// Name of a landmark, `None` for ids outside the catalog
pub fn landmark_name(id: LandmarkId) -> Option<&'static str> {
    LANDMARK_NAMES.get(id as usize).copied()
}

/// Whether `id` is a valid landmark id
pub fn is_valid(id: LandmarkId) -> bool {
    (id as usize) < LANDMARKS_PER_HAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_names() {
        assert_eq!(landmark_name(WRIST), Some("WRIST"));
        assert_eq!(landmark_name(INDEX_FINGER_TIP), Some("INDEX_FINGER_TIP"));
        assert_eq!(landmark_name(PINKY_TIP), Some("PINKY_TIP"));
        assert_eq!(landmark_name(21), None);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(0));
        assert!(is_valid(20));
        assert!(!is_valid(21));
    }
}
