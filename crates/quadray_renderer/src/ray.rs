//! Ray type for recursive tracing.
//!
//! A ray is an origin point and a unit direction. Every bounce replaces the
//! ray with a new one built by [`Ray::reflect`], [`Ray::refract`] or
//! [`Ray::diffuse_bounce`].

use quadray_math::{cosine_hemisphere, DVec3, Frame};
use rand::{Rng, RngCore};

/// How far a refracted ray starts below an entered surface.
pub const REFRACTION_OFFSET: f64 = 0.05;

/// A ray with an origin and a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    origin: DVec3,
    /// Direction vector (unit length)
    direction: DVec3,
}

impl Ray {
    /// Create a new ray, normalizing the direction.
    ///
    /// The direction must be nonzero.
    #[inline]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }

    /// Mirror this ray about `normal`, starting from `point`.
    pub fn reflect(&self, point: DVec3, normal: DVec3) -> Ray {
        let d = self.direction;
        Ray::new(point, d - 2.0 * d.dot(normal) * normal)
    }

    /// Bend this ray through a boundary with refractive index `eta`.
    ///
    /// `normal` is the outward surface normal at `point`. Whether the ray is
    /// entering or leaving the medium is decided by the sign of `d . n`.
    /// Total internal reflection (a negative `k` on either side of the
    /// boundary) falls back to [`Ray::reflect`].
    pub fn refract(&self, point: DVec3, normal: DVec3, eta: f64) -> Ray {
        let d = self.direction;
        let c = d.dot(normal);

        if c < 0.0 {
            let k = 1.0 - (1.0 / (eta * eta)) * (1.0 - c * c);
            if k < 0.0 {
                return self.reflect(point, normal);
            }
            // Entering: start just below the surface
            let origin = point - normal * REFRACTION_OFFSET;
            Ray::new(origin, d / eta - (c / eta + k.sqrt()) * normal)
        } else {
            let normal = -normal;
            let c = -c;
            let k = 1.0 - eta * eta * (1.0 - c * c);
            if k < 0.0 {
                return self.reflect(point, normal);
            }
            Ray::new(point, eta * d - (c * eta + k.sqrt()) * normal)
        }
    }

    /// Scatter into a cosine-weighted direction around `normal`.
    pub fn diffuse_bounce(point: DVec3, normal: DVec3, rng: &mut dyn RngCore) -> Ray {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.gen();
        let local = cosine_hemisphere(r1, r2);

        let aux = DVec3::new(
            rng.gen::<f64>() - 0.5,
            rng.gen::<f64>() - 0.5,
            rng.gen::<f64>() - 0.5,
        );
        let frame = Frame::from_normal(normal, aux);

        Ray::new(point, frame.to_world(local))
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            direction: DVec3::NEG_Z,
        }
    }
}
