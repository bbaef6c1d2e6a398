//! Per-entity tracking state and temporal smoothing

pub mod registry;
pub mod smoothing;

pub use registry::{EntityKey, EntityKind, JointRegistry, SmoothingState};
pub use smoothing::{update, Emission, SmoothingConfig};
