//! Joint registry
//!
//! Holds the last smoothed position and rotation of every tracked entity,
//! keyed by hand and entity. Entries appear the first time an entity is
//! observed and live until the registry is cleared.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::math::{Quat, Vec3};
use crate::skeleton::{bone, landmark_name, BoneId, LandmarkId};

/// What a key refers to within a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntityKind {
    Landmark(LandmarkId),
    Bone(BoneId),
}

/// Typed key of one tracked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityKey {
    pub hand: u8,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl EntityKey {
    pub fn landmark(hand: u8, id: LandmarkId) -> Self {
        Self { hand, kind: EntityKind::Landmark(id) }
    }

    pub fn bone(hand: u8, id: BoneId) -> Self {
        Self { hand, kind: EntityKind::Bone(id) }
    }

    pub fn is_bone(&self) -> bool {
        matches!(self.kind, EntityKind::Bone(_))
    }

    /// Stable object name, e.g. `Hand0_LM_8_INDEX_FINGER_TIP` or `Hand1_Index_PIP`
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Landmark(id) => match landmark_name(id) {
                Some(name) => write!(f, "Hand{}_LM_{}_{}", self.hand, id, name),
                None => write!(f, "Hand{}_LM_{}", self.hand, id),
            },
            EntityKind::Bone(id) => match bone(id) {
                Some(segment) => write!(f, "Hand{}_{}", self.hand, segment.name),
                None => write!(f, "Hand{}_Bone_{}", self.hand, id),
            },
        }
    }
}

/// Last smoothed values of one entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingState {
    pub last_position: Option<Vec3>,
    pub last_rotation: Option<Quat>,
}

/// Smoothing state for every tracked entity
///
/// Not synchronized: the owner must serialize access.
#[derive(Debug, Default)]
pub struct JointRegistry {
    states: HashMap<EntityKey, SmoothingState>,
}

impl JointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&SmoothingState> {
        self.states.get(key)
    }

    /// State for `key`, created empty on first use
    pub(crate) fn state_mut(&mut self, key: EntityKey) -> &mut SmoothingState {
        self.states.entry(key).or_default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Hands with at least one tracked entity, ascending
    pub fn hands(&self) -> Vec<u8> {
        let mut hands: Vec<u8> = self.states.keys().map(|k| k.hand).collect();
        hands.sort_unstable();
        hands.dedup();
        hands
    }

    /// Drop all state, returning how many entries were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.states.len();
        self.states.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(EntityKey::landmark(0, 8).name(), "Hand0_LM_8_INDEX_FINGER_TIP");
        assert_eq!(EntityKey::landmark(1, 0).name(), "Hand1_LM_0_WRIST");
        assert_eq!(EntityKey::bone(1, 0).name(), "Hand1_Wrist_Thumb");
        assert_eq!(EntityKey::bone(0, 9).name(), "Hand0_Index_PIP");
        assert_eq!(EntityKey::bone(0, 99).name(), "Hand0_Bone_99");
    }

    #[test]
    fn test_keys_distinct_per_hand() {
        assert_ne!(EntityKey::landmark(0, 3), EntityKey::landmark(1, 3));
        assert_ne!(EntityKey::landmark(0, 3), EntityKey::bone(0, 3));
    }

    #[test]
    fn test_lazy_creation_and_clear() {
        let mut registry = JointRegistry::new();
        assert!(registry.get(&EntityKey::landmark(0, 0)).is_none());

        registry.state_mut(EntityKey::landmark(0, 0)).last_position = Some(Vec3::x());
        registry.state_mut(EntityKey::bone(1, 2));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.hands(), vec![0, 1]);
        assert_eq!(
            registry.get(&EntityKey::landmark(0, 0)).unwrap().last_position,
            Some(Vec3::x())
        );

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_key_serialization() {
        let value = serde_json::to_value(EntityKey::bone(1, 4)).unwrap();
        assert_eq!(value, serde_json::json!({"hand": 1, "kind": "bone", "id": 4}));
    }
}
