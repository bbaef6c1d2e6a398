//! Hand skeleton catalog
//!
//! Fixed landmark ids (MediaPipe hand topology) and the bone segments
//! derived from them.

pub mod bones;
pub mod landmarks;

pub use bones::{bone, BoneId, BoneKind, BoneSegment, BONES, FINGER_BONE_COUNT, PALM_BONE_COUNT};
pub use landmarks::{landmark_name, LandmarkId, LANDMARK_NAMES};
