//! Stage snapshot: the complete observable state produced after each step.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Color, SimTime};

/// Everything a presentation layer or test needs after one step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub time: SimTime,
    pub wind: WindView,
    pub ring: Vec<SpawnPointView>,
    pub collections: Vec<CollectionView>,
    pub entities: Vec<EntityView>,
    pub stats: SpawnStats,
    pub events: Vec<SimEvent>,
}

/// Current and target wind values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindView {
    pub direction: f64,
    pub intensity: f64,
    pub target_direction: f64,
    pub target_intensity: f64,
    /// Ring index the wind blows toward (exclusion side).
    pub exit_index: Option<usize>,
    /// Ring index the wind blows from (admission side).
    pub entry_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPointView {
    pub index: usize,
    pub position: DVec3,
    pub state: SpawnPointState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectionView {
    pub class: EntityClass,
    pub live: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub entity_id: u64,
    pub class: EntityClass,
    pub position: DVec3,
    pub state: Option<LifecycleState>,
    pub tint: Option<Color>,
}

/// Running counters for spawn attempts. Rejections are expected and only
/// counted, never escalated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnStats {
    pub attempts: u64,
    pub spawned: u64,
    pub no_available_point: u64,
    pub empty_weight_pool: u64,
    pub collection_full: u64,
    pub factory_failed: u64,
    pub respawned: u64,
    pub removed: u64,
}

impl SpawnStats {
    /// Total attempts that did not produce an actor.
    pub fn rejected(&self) -> u64 {
        self.no_available_point + self.empty_weight_pool + self.collection_full + self.factory_failed
    }

    pub fn record_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::NoAvailablePoint => self.no_available_point += 1,
            RejectReason::EmptyWeightPool => self.empty_weight_pool += 1,
            RejectReason::CollectionFull => self.collection_full += 1,
            RejectReason::FactoryFailed => self.factory_failed += 1,
        }
    }
}
