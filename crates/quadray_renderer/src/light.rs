//! Point light.

use quadray_math::DVec3;

/// A single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub origin: DVec3,
    /// Radiant intensity; falls off with squared distance
    pub intensity: f64,
}

impl Light {
    pub fn new(origin: DVec3, intensity: f64) -> Self {
        Self { origin, intensity }
    }
}
