//! Bone segment catalog
//!
//! Each segment is a rigid pair of landmarks whose orientation is derived
//! from the two endpoint positions.

use serde::Serialize;

use super::landmarks::*;

/// Index into [`BONES`]
pub type BoneId = u8;

/// Which part of the hand a segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoneKind {
    /// Wrist to a finger base
    Palm,
    /// Finger phalanx
    Finger,
}

/// Static bone segment definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoneSegment {
    pub name: &'static str,
    pub start: LandmarkId,
    pub end: LandmarkId,
    pub kind: BoneKind,
}

impl BoneSegment {
    const fn palm(name: &'static str, start: LandmarkId, end: LandmarkId) -> Self {
        Self { name, start, end, kind: BoneKind::Palm }
    }

    const fn finger(name: &'static str, start: LandmarkId, end: LandmarkId) -> Self {
        Self { name, start, end, kind: BoneKind::Finger }
    }
}

pub const PALM_BONE_COUNT: usize = 5;
pub const FINGER_BONE_COUNT: usize = 15;

/// Palm segments first, then finger phalanges from thumb to pinky
pub const BONES: [BoneSegment; PALM_BONE_COUNT + FINGER_BONE_COUNT] = [
    BoneSegment::palm("Wrist_Thumb", WRIST, THUMB_CMC),
    BoneSegment::palm("Wrist_Index", WRIST, INDEX_FINGER_MCP),
    BoneSegment::palm("Wrist_Middle", WRIST, MIDDLE_FINGER_MCP),
    BoneSegment::palm("Wrist_Ring", WRIST, RING_FINGER_MCP),
    BoneSegment::palm("Wrist_Pinky", WRIST, PINKY_MCP),
    BoneSegment::finger("Thumb_CMC", THUMB_CMC, THUMB_MCP),
    BoneSegment::finger("Thumb_MCP", THUMB_MCP, THUMB_IP),
    BoneSegment::finger("Thumb_IP", THUMB_IP, THUMB_TIP),
    BoneSegment::finger("Index_MCP", INDEX_FINGER_MCP, INDEX_FINGER_PIP),
    BoneSegment::finger("Index_PIP", INDEX_FINGER_PIP, INDEX_FINGER_DIP),
    BoneSegment::finger("Index_DIP", INDEX_FINGER_DIP, INDEX_FINGER_TIP),
    BoneSegment::finger("Middle_MCP", MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP),
    BoneSegment::finger("Middle_PIP", MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP),
    BoneSegment::finger("Middle_DIP", MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP),
    BoneSegment::finger("Ring_MCP", RING_FINGER_MCP, RING_FINGER_PIP),
    BoneSegment::finger("Ring_PIP", RING_FINGER_PIP, RING_FINGER_DIP),
    BoneSegment::finger("Ring_DIP", RING_FINGER_DIP, RING_FINGER_TIP),
    BoneSegment::finger("Pinky_MCP", PINKY_MCP, PINKY_PIP),
    BoneSegment::finger("Pinky_PIP", PINKY_PIP, PINKY_DIP),
    BoneSegment::finger("Pinky_DIP", PINKY_DIP, PINKY_TIP),
];

/// Look up a bone by id
pub fn bone(id: BoneId) -> Option<&'static BoneSegment> {
    BONES.get(id as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_endpoints_in_catalog() {
        for segment in &BONES {
            assert!(is_valid(segment.start), "{} start", segment.name);
            assert!(is_valid(segment.end), "{} end", segment.name);
            assert_ne!(segment.start, segment.end, "{}", segment.name);
        }
    }

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = BONES.iter().map(|b| b.name).collect();
        assert_eq!(names.len(), BONES.len());
    }

    #[test]
    fn test_kind_layout() {
        let palm = BONES.iter().filter(|b| b.kind == BoneKind::Palm).count();
        assert_eq!(palm, PALM_BONE_COUNT);
        assert!(BONES[..PALM_BONE_COUNT].iter().all(|b| b.start == WRIST));
        assert_eq!(bone(5).map(|b| b.name), Some("Thumb_CMC"));
        assert!(bone(20).is_none());
    }
}
