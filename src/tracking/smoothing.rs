//! Smoothing engine
//!
//! Blends each new observation with the entity's previous smoothed value:
//! positions by linear interpolation, bone orientations by spherical
//! interpolation. The first observation of an entity is used as-is.
//! Entities missing from a frame are left untouched, so they hold their last
//! pose instead of snapping away.

use serde::{Deserialize, Serialize};

use super::registry::{EntityKey, JointRegistry};
use crate::codec::{Frame, Hand};
use crate::constants::{DEFAULT_POSITION_SMOOTHING, DEFAULT_ROTATION_SMOOTHING, LANDMARKS_PER_HAND};
use crate::math::{lerp, slerp, solve, Projection, Quat, Vec3};
use crate::skeleton::{landmarks::WRIST, BoneId, BoneKind, BONES};

/// Interpolation weights toward the newest observation
///
/// `1.0` follows the input exactly, `0.0` never moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub position: f64,
    pub rotation: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION_SMOOTHING,
            rotation: DEFAULT_ROTATION_SMOOTHING,
        }
    }
}

/// Final transform of one entity for the output sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Emission {
    pub key: EntityKey,
    pub position: Vec3,
    /// Present for bone segments only
    pub rotation: Option<Quat>,
}

/// Smooth every entity observed in `frame`
///
/// Emissions are ordered per hand: 21 landmarks by id, then every bone in
/// catalog order. A landmark whose position would not be finite keeps its
/// previous state and is not emitted, along with any bone that has no
/// position for one of its endpoints.
pub fn update(
    frame: &Frame,
    registry: &mut JointRegistry,
    config: &SmoothingConfig,
    projection: &Projection,
) -> Vec<Emission> {
    let mut emissions = Vec::with_capacity(frame.len() * (LANDMARKS_PER_HAND + BONES.len()));
    for hand in frame.hands() {
        update_hand(hand, registry, config, projection, &mut emissions);
    }
    emissions
}

fn update_hand(
    hand: &Hand,
    registry: &mut JointRegistry,
    config: &SmoothingConfig,
    projection: &Projection,
    emissions: &mut Vec<Emission>,
) {
    let hand_index = hand.hand_index();
    let mut smoothed: [Option<Vec3>; LANDMARKS_PER_HAND] = [None; LANDMARKS_PER_HAND];

    for landmark in hand.landmarks() {
        let key = EntityKey::landmark(hand_index, landmark.id);
        let observed = projection.project(landmark);
        let previous = registry.get(&key).and_then(|state| state.last_position);

        let position = match previous {
            Some(previous) => lerp(&previous, &observed, config.position),
            None => observed,
        };
        // An overflowing observation must not poison the joint's history
        if !is_finite(&position) {
            tracing::debug!("Skipped {}: projected position is not finite", key);
            smoothed[landmark.id as usize] = previous;
            continue;
        }
        registry.state_mut(key).last_position = Some(position);

        smoothed[landmark.id as usize] = Some(position);
        emissions.push(Emission { key, position, rotation: None });
    }

    let Some(wrist) = smoothed[WRIST as usize] else {
        return;
    };
    for (id, segment) in BONES.iter().enumerate() {
        let key = EntityKey::bone(hand_index, id as BoneId);
        let (Some(start), Some(end)) = (smoothed[segment.start as usize], smoothed[segment.end as usize])
        else {
            continue;
        };
        let midpoint = (start + end) * 0.5;

        // Palm bones start at the wrist, where the palm vector is their own axis
        let palm_up = match segment.kind {
            BoneKind::Finger => (wrist - midpoint).try_normalize(1e-9),
            BoneKind::Palm => None,
        };
        let observed = solve(&start, &end, palm_up.as_ref());

        let previous = registry.get(&key).and_then(|state| state.last_rotation);
        let rotation = match previous {
            Some(previous) => slerp(&previous, &observed, config.rotation),
            None => observed,
        };
        if !is_finite(&midpoint) || !rotation.coords.iter().all(|c| c.is_finite()) {
            tracing::debug!("Skipped {}: transform is not finite", key);
            continue;
        }

        let state = registry.state_mut(key);
        state.last_position = Some(midpoint);
        state.last_rotation = Some(rotation);

        emissions.push(Emission { key, position: midpoint, rotation: Some(rotation) });
    }
}

fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
