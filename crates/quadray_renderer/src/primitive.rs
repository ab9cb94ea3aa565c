//! Primitive trait and Intersection for ray-surface queries.

use crate::{Material, Ray};
use quadray_math::DVec3;

/// A completed ray-primitive hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f64,
    /// World-space hit point
    pub point: DVec3,
    /// Outward unit normal at `point`
    pub normal: DVec3,
}

impl Intersection {
    /// Complete a hit at parameter `t` along `ray` on `primitive`.
    pub fn new(ray: &Ray, t: f64, primitive: &dyn Primitive) -> Self {
        let point = ray.at(t);
        Self {
            t,
            point,
            normal: primitive.normal(point),
        }
    }
}

/// An implicit surface that rays can hit.
pub trait Primitive: Send + Sync {
    /// Ray parameter of the nearest hit in front of the ray origin, or the
    /// far hit when the origin is inside the surface.
    ///
    /// `None` means the ray misses.
    fn intersect(&self, ray: &Ray) -> Option<f64>;

    /// Outward unit normal at a point on the surface.
    fn normal(&self, point: DVec3) -> DVec3;

    fn material(&self) -> &Material;
}
