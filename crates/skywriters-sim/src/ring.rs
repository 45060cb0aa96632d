//! Fixed ring of spawn locations around the stage.

use glam::DVec3;

use skywriters_core::constants::MAX_RING_POINTS;
use skywriters_core::error::ConfigError;
use skywriters_core::types::{heading_vector, horizontal_distance};

/// Evenly spaced points on a horizontal circle. Immutable once built.
#[derive(Debug, Clone)]
pub struct RingTopology {
    center: DVec3,
    radius: f64,
    points: Vec<DVec3>,
}

impl RingTopology {
    /// Lay out `count` points around `center`, clamped to
    /// [`MAX_RING_POINTS`]. Point `i` sits at angle `i * 360 / count`.
    pub fn build(center: DVec3, radius: f64, count: usize) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::NoRingPoints);
        }
        let count = count.min(MAX_RING_POINTS);
        let step = 360.0 / count as f64;
        let points = (0..count)
            .map(|i| center + heading_vector(i as f64 * step) * radius)
            .collect();
        Ok(Self {
            center,
            radius,
            points,
        })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn point(&self, index: usize) -> DVec3 {
        self.assert_index(index);
        self.points[index]
    }

    /// Angle of a point in degrees.
    pub fn angle_of(&self, index: usize) -> f64 {
        self.assert_index(index);
        index as f64 * 360.0 / self.len() as f64
    }

    /// Index of the point nearest `target` in the horizontal plane.
    /// Ties go to the lowest index.
    pub fn closest_point_to(&self, target: DVec3) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, point) in self.points.iter().enumerate() {
            let distance = horizontal_distance(*point, target);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Index of the point nearest the ring position at `angle_degrees`.
    pub fn closest_point_in_direction(&self, angle_degrees: f64) -> usize {
        self.closest_point_to(self.center + heading_vector(angle_degrees) * self.radius)
    }

    /// Indices within `count - 1` ring steps of `index` on either side,
    /// excluding `index` itself, without duplicates.
    pub fn neighbors(&self, index: usize, count: usize) -> Vec<usize> {
        self.assert_index(index);
        let n = self.len();
        let mut result = Vec::with_capacity(2 * count.saturating_sub(1));
        for step in 1..count {
            let step = step % n;
            for candidate in [(index + step) % n, (index + n - step) % n] {
                if candidate != index && !result.contains(&candidate) {
                    result.push(candidate);
                }
            }
        }
        result
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.len(),
            "ring index {index} must exist (ring has {} points)",
            self.len()
        );
    }
}
