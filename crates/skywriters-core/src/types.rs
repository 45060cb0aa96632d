//! Fundamental geometric and simulation types.
//!
//! Positions are `glam::DVec3` in world units. The stage lies in the XZ
//! plane; Y is height and is ignored by every topology computation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each step).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one step of `dt` seconds. Negative deltas are treated as zero
    /// so the clock stays monotonic.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt.max(0.0);
    }
}

/// RGBA colour with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(0.9, 0.2, 0.2);
    pub const GREEN: Color = Color::rgb(0.2, 0.8, 0.3);
    pub const BLUE: Color = Color::rgb(0.2, 0.4, 0.9);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Distance between two points, ignoring height.
pub fn horizontal_distance(a: DVec3, b: DVec3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Unit vector in the stage plane for an angle in degrees.
/// 0 points along +X, 90 along +Z.
pub fn heading_vector(angle_degrees: f64) -> DVec3 {
    let radians = angle_degrees.to_radians();
    DVec3::new(radians.cos(), 0.0, radians.sin())
}

/// Mirror `point` through `center` in the stage plane. Height is kept.
pub fn antipodal_point(center: DVec3, point: DVec3) -> DVec3 {
    let offset = point - center;
    DVec3::new(center.x - offset.x, point.y, center.z - offset.z)
}
