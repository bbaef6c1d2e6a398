//! Geometry for landmark placement and bone orientation

pub mod projection;
pub mod rotation;

pub use projection::{project, CameraFrame, Projection};
pub use rotation::{lerp, slerp, solve, MIN_BONE_LENGTH};

/// World-space vector
pub type Vec3 = nalgebra::Vector3<f64>;

/// World-space orientation
pub type Quat = nalgebra::UnitQuaternion<f64>;
