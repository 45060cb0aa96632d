//! Wind governor: a slowly drifting direction and intensity, projected onto
//! the spawn ring as an admission arc (upwind) and an exclusion arc
//! (downwind).

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skywriters_core::config::WindSettings;
use skywriters_core::enums::SpawnPointState;
use skywriters_core::state::WindView;
use skywriters_core::types::{heading_vector, normalize_degrees, shortest_arc};

use crate::spawn_point::{PointTransition, SpawnRing};

/// Ring arcs derived from the current wind direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindArcs {
    /// Point facing away from the wind; actors enter here.
    pub entry: usize,
    /// Point the wind blows toward; actors leave here.
    pub exit: usize,
    /// `entry` and its neighbours, minus anything in `exit_arc`.
    pub entry_arc: Vec<usize>,
    /// `exit` and its neighbours.
    pub exit_arc: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct WindGovernor {
    direction: f64,
    intensity: f64,
    target_direction: f64,
    target_intensity: f64,
    settings: WindSettings,
    reroll_timer: f64,
    pinned: bool,
    influence_width: usize,
    arcs: Option<WindArcs>,
}

impl WindGovernor {
    pub fn new(settings: &WindSettings, influence_width: usize) -> Self {
        let direction = normalize_degrees(settings.direction);
        let intensity = settings.intensity.max(0.0);
        Self {
            direction,
            intensity,
            target_direction: direction,
            target_intensity: intensity,
            settings: settings.clone(),
            reroll_timer: 0.0,
            pinned: settings.pinned,
            influence_width,
            arcs: None,
        }
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Arcs from the most recent ring application.
    pub fn arcs(&self) -> Option<&WindArcs> {
        self.arcs.as_ref()
    }

    /// Horizontal wind vector scaled by intensity.
    pub fn velocity(&self) -> DVec3 {
        heading_vector(self.direction) * self.intensity
    }

    pub fn view(&self) -> WindView {
        WindView {
            direction: self.direction,
            intensity: self.intensity,
            target_direction: self.target_direction,
            target_intensity: self.target_intensity,
            exit_index: self.arcs.as_ref().map(|a| a.exit),
            entry_index: self.arcs.as_ref().map(|a| a.entry),
        }
    }

    /// Hold direction and intensity fixed until [`release`](Self::release).
    pub fn pin(&mut self, direction: f64, intensity: f64) {
        self.direction = normalize_degrees(direction);
        self.intensity = intensity.max(0.0);
        self.target_direction = self.direction;
        self.target_intensity = self.intensity;
        self.reroll_timer = 0.0;
        self.pinned = true;
    }

    pub fn release(&mut self) {
        self.pinned = false;
        self.reroll_timer = 0.0;
    }

    /// Advance the re-roll timer and ease toward the targets.
    /// Returns the new targets when they were re-rolled this step.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Option<(f64, f64)> {
        if self.pinned {
            return None;
        }
        let dt = dt.max(0.0);

        let mut rerolled = None;
        self.reroll_timer += dt;
        while self.reroll_timer >= self.settings.reroll_interval_secs {
            self.reroll_timer -= self.settings.reroll_interval_secs;
            self.target_direction = rng.gen_range(0.0..360.0);
            self.target_intensity = if self.settings.intensity_max > self.settings.intensity_min {
                rng.gen_range(self.settings.intensity_min..=self.settings.intensity_max)
            } else {
                self.settings.intensity_min
            };
            rerolled = Some((self.target_direction, self.target_intensity));
        }
        if let Some((direction, intensity)) = rerolled {
            info!(direction, intensity, "wind targets re-rolled");
        }

        let t = (self.settings.smoothing_per_sec * dt).clamp(0.0, 1.0);
        self.direction = normalize_degrees(
            self.direction + shortest_arc(self.direction, self.target_direction) * t,
        );
        self.intensity += (self.target_intensity - self.intensity) * t;

        rerolled
    }

    /// Project the current direction onto the ring.
    ///
    /// The exit arc is forced to Disabled and the entry arc is held in
    /// Spawning with no revert, the exit arc winning any overlap. Every other
    /// point goes back to Available, except points whose Spawning hold still
    /// has a revert scheduled. Those keep it.
    pub fn apply_to_ring(
        &mut self,
        ring: &mut SpawnRing,
        now: f64,
    ) -> (WindArcs, Vec<PointTransition>) {
        let topology = ring.topology();
        let exit = topology.closest_point_in_direction(self.direction);
        let entry = topology.closest_point_in_direction(self.direction + 180.0);

        let mut exit_arc = vec![exit];
        exit_arc.extend(topology.neighbors(exit, self.influence_width));
        let mut entry_arc: Vec<usize> = std::iter::once(entry)
            .chain(topology.neighbors(entry, self.influence_width))
            .filter(|i| !exit_arc.contains(i))
            .collect();
        entry_arc.sort_unstable();
        exit_arc.sort_unstable();

        if self.arcs.as_ref().map(|a| (a.entry, a.exit)) != Some((entry, exit)) {
            debug!(entry, exit, direction = self.direction, "wind arcs moved");
        }

        let mut transitions = Vec::new();
        for index in 0..ring.len() {
            if exit_arc.contains(&index) {
                transitions.extend(ring.go_to_state(index, SpawnPointState::Disabled, now));
            } else if entry_arc.contains(&index) {
                transitions.extend(ring.hold_spawning(index, now));
            } else if ring.state(index) == SpawnPointState::Spawning
                && ring.point(index).has_pending_revert()
            {
                continue;
            } else {
                transitions.extend(ring.go_to_state(index, SpawnPointState::Available, now));
            }
        }

        let arcs = WindArcs {
            entry,
            exit,
            entry_arc,
            exit_arc,
        };
        self.arcs = Some(arcs.clone());
        (arcs, transitions)
    }
}
