//! Two-sheeted hyperboloid primitive.
//!
//! In axes translated to `origin` the surface is
//! `(x/a)^2 - (y/b)^2 + (z/c)^2 = -1`, two sheets opening along `+y` and `-y`
//! with vertices at `y = +-b`.

use crate::{primitive::Primitive, Material, Ray};
use quadray_math::{resolve_quadratic, DVec3};

/// A two-sheeted hyperboloid.
#[derive(Debug, Clone)]
pub struct Hyperboloid {
    origin: DVec3,
    /// Semi-axis coefficients (a, b, c), all nonzero
    coeffs: DVec3,
    material: Material,
}

impl Hyperboloid {
    pub fn new(origin: DVec3, coeffs: DVec3, material: Material) -> Self {
        Self {
            origin,
            coeffs,
            material,
        }
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn coeffs(&self) -> DVec3 {
        self.coeffs
    }
}

impl Primitive for Hyperboloid {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let d = ray.direction() / self.coeffs;
        let o = (ray.origin() - self.origin) / self.coeffs;

        let a = d.x * d.x - d.y * d.y + d.z * d.z;
        let b = 2.0 * (d.x * o.x - d.y * o.y + d.z * o.z);
        let c = o.x * o.x - o.y * o.y + o.z * o.z + 1.0;

        resolve_quadratic(a, b, c)
    }

    fn normal(&self, point: DVec3) -> DVec3 {
        let p = point - self.origin;
        let sq = self.coeffs * self.coeffs;
        DVec3::new(p.x / sq.x, -p.y / sq.y, p.z / sq.z).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyperboloid() -> Hyperboloid {
        Hyperboloid::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 1.0), Material::default())
    }

    #[test]
    fn test_hit_vertex_along_axis() {
        let h = hyperboloid();
        let ray = Ray::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y);

        // Upper sheet vertex at y = b = 2
        let t = h.intersect(&ray).expect("ray should hit the upper sheet");
        assert!((t - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_between_sheets() {
        let h = hyperboloid();
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);

        let t = h.intersect(&ray).expect("ray from the gap should hit a sheet");
        assert!((t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_through_gap() {
        let h = hyperboloid();

        // Horizontal ray through the gap between the sheets
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        assert!(h.intersect(&ray).is_none());
    }

    #[test]
    fn test_hit_point_on_surface() {
        let h = Hyperboloid::new(
            DVec3::new(1.0, -1.0, 2.0),
            DVec3::new(2.0, 1.0, 3.0),
            Material::default(),
        );
        let ray = Ray::new(DVec3::new(3.0, 8.0, 4.0), DVec3::new(-0.2, -1.0, -0.1));

        let t = h.intersect(&ray).expect("ray should hit");
        let p = (ray.at(t) - h.origin()) / h.coeffs();
        let implicit = p.x * p.x - p.y * p.y + p.z * p.z;
        assert!((implicit + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normal_sign_pattern() {
        let h = hyperboloid();

        // The y-term of the gradient is negated
        let n = h.normal(DVec3::new(0.0, 2.0, 0.0));
        assert!((n - DVec3::NEG_Y).length() < 1e-12);

        let n = h.normal(DVec3::new(1.0, 0.0, 0.0));
        assert!((n - DVec3::X).length() < 1e-12);
    }
}
