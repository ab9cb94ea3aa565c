//! Sphere primitive for ray tracing.

use crate::{primitive::Primitive, Material, Ray};
use quadray_math::{resolve_quadratic, DVec3};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    origin: DVec3,
    radius: f64,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// A negative radius is clamped to zero, which leaves a single point.
    pub fn new(origin: DVec3, radius: f64, material: Material) -> Self {
        Self {
            origin,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin() - self.origin;
        let b = 2.0 * ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Unit direction, so a = 1
        resolve_quadratic(1.0, b, c)
    }

    fn normal(&self, point: DVec3) -> DVec3 {
        (point - self.origin).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
