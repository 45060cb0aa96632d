//! Spatial predicates for the stage and the spawn ring band.

use glam::DVec3;

use skywriters_core::config::StageSettings;
use skywriters_core::types::horizontal_distance;

/// Region membership used by the lifecycle rules.
pub trait RegionTest {
    /// Horizontal distance from the stage centre.
    fn distance(&self, position: DVec3) -> f64;
    fn inside_stage(&self, position: DVec3) -> bool;
    fn inside_spawn_ring(&self, position: DVec3) -> bool;
}

/// Concentric stage disc and spawn band. Height is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRegions {
    pub center: DVec3,
    pub stage_radius: f64,
    pub spawn_radius: f64,
}

impl StageRegions {
    pub fn new(center: DVec3, stage_radius: f64, spawn_radius: f64) -> Self {
        Self {
            center,
            stage_radius,
            spawn_radius,
        }
    }

    pub fn from_settings(settings: &StageSettings) -> Self {
        Self::new(settings.center, settings.stage_radius, settings.spawn_radius)
    }
}

impl RegionTest for StageRegions {
    fn distance(&self, position: DVec3) -> f64 {
        horizontal_distance(self.center, position)
    }

    fn inside_stage(&self, position: DVec3) -> bool {
        self.distance(position) <= self.stage_radius
    }

    /// The band `stage_radius < d <= spawn_radius`.
    fn inside_spawn_ring(&self, position: DVec3) -> bool {
        let d = self.distance(position);
        d > self.stage_radius && d <= self.spawn_radius
    }
}
