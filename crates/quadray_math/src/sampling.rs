//! Warps from uniform random numbers to the distributions the tracer samples.
//!
//! These are pure functions; callers draw the uniform inputs from their own
//! generator.

use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Cosine-weighted direction on the `+z` hemisphere.
///
/// `r1` and `r2` are uniform in `[0, 1)`. The result is unit length.
pub fn cosine_hemisphere(r1: f64, r2: f64) -> DVec3 {
    let phi = 2.0 * PI * r1;
    let radius = (1.0 - r2).sqrt();
    DVec3::new(phi.cos() * radius, phi.sin() * radius, r2.sqrt())
}

/// Box-Muller transform to a pair of Gaussian offsets with standard deviation 0.5.
///
/// `x` must lie in `(0, 1]` so the logarithm stays finite; `y` is uniform in `[0, 1)`.
pub fn gaussian_offset(x: f64, y: f64) -> DVec2 {
    let r = (-2.0 * x.ln()).sqrt();
    let theta = 2.0 * PI * y;
    DVec2::new(0.5 * r * theta.cos(), 0.5 * r * theta.sin())
}
