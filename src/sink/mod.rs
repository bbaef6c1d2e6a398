//! Output sinks
//!
//! A sink receives the emissions of each tick and applies them to whatever
//! represents the hands downstream (scene objects, a rig, a network peer).
//! The smoothing engine never talks to a sink directly.

use std::collections::HashMap;

use crate::math::{Quat, Vec3};
use crate::tracking::{EntityKey, Emission};

/// Consumer of smoothed transforms
pub trait OutputSink {
    /// Apply one tick's emissions
    fn apply(&mut self, emissions: &[Emission]);

    /// Forget everything applied so far (tracking was reset)
    fn clear(&mut self) {}
}

/// Latest transform of one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Option<Quat>,
}

/// Keeps the latest transform per entity in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    transforms: HashMap<EntityKey, Transform>,
    batches: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Transform> {
        self.transforms.get(key)
    }

    /// Look up by object name, e.g. `Hand0_Index_MCP`
    pub fn get_by_name(&self, name: &str) -> Option<&Transform> {
        self.transforms
            .iter()
            .find(|(key, _)| key.name() == name)
            .map(|(_, transform)| transform)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &Transform)> {
        self.transforms.iter()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Number of non-empty batches applied
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

impl OutputSink for MemorySink {
    fn apply(&mut self, emissions: &[Emission]) {
        if emissions.is_empty() {
            return;
        }
        for emission in emissions {
            self.transforms.insert(
                emission.key,
                Transform {
                    position: emission.position,
                    rotation: emission.rotation,
                },
            );
        }
        self.batches += 1;
    }

    fn clear(&mut self) {
        self.transforms.clear();
    }
}

/// Writes transforms to the trace log
#[derive(Debug, Default)]
pub struct LogSink {
    applied: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total emissions logged
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl OutputSink for LogSink {
    fn apply(&mut self, emissions: &[Emission]) {
        for emission in emissions {
            let p = emission.position;
            match emission.rotation {
                Some(q) => tracing::trace!(
                    "{} pos=({:.4}, {:.4}, {:.4}) rot=({:.4}, {:.4}, {:.4}, {:.4})",
                    emission.key, p.x, p.y, p.z, q.w, q.i, q.j, q.k
                ),
                None => tracing::trace!("{} pos=({:.4}, {:.4}, {:.4})", emission.key, p.x, p.y, p.z),
            }
        }
        self.applied += emissions.len() as u64;
    }

    fn clear(&mut self) {
        tracing::debug!("Output cleared after {} transforms", self.applied);
    }
}
