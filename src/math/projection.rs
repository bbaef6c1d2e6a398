//! Landmark to world-space projection
//!
//! Landmarks arrive as normalized image coordinates. They are placed on a
//! plane `depth_scale` units in front of the camera, one world unit across,
//! and pushed along the view axis by their relative depth.

use serde::{Deserialize, Serialize};

use super::{Quat, Vec3};
use crate::codec::Landmark;
use crate::constants::DEFAULT_DEPTH_SCALE;

/// Camera placement used as the projection reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraFrame {
    /// Camera at `position` looking down its local -Z with local +Y up
    pub fn from_pose(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            forward: rotation * Vec3::new(0.0, 0.0, -1.0),
            right: rotation * Vec3::x(),
            up: rotation * Vec3::y(),
        }
    }
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self::from_pose(Vec3::zeros(), Quat::identity())
    }
}

/// Camera plus depth scale: everything needed to place a landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub camera: CameraFrame,
    pub depth_scale: f64,
}

impl Projection {
    pub fn new(camera: CameraFrame, depth_scale: f64) -> Self {
        Self { camera, depth_scale }
    }

    pub fn project(&self, landmark: &Landmark) -> Vec3 {
        project(landmark, &self.camera, self.depth_scale)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(CameraFrame::default(), DEFAULT_DEPTH_SCALE)
    }
}

/// Map a normalized landmark into world space
///
/// Image y grows downward and producer depth grows away from the camera's
/// subject, so both are flipped before placement.
pub fn project(landmark: &Landmark, camera: &CameraFrame, depth_scale: f64) -> Vec3 {
    let x = landmark.x;
    let y = 1.0 - landmark.y;
    let z = -landmark.z;

    camera.position
        + camera.forward * depth_scale
        + camera.right * (x - 0.5)
        + camera.up * (y - 0.5)
        + camera.forward * (z * depth_scale * 0.5)
}
