//! Scene container and recursive shading.
//!
//! The scene owns every primitive, the point light and the camera. It is
//! built once and only read while rendering, so workers share it by
//! reference.

use crate::{
    primitive::{Intersection, Primitive},
    region::{render_region, Region, RegionResult},
    Camera, Color, Light, Material, Ray, RenderConfig, RenderResult,
};
use quadray_math::DVec3;
use rand::RngCore;
use std::f64::consts::PI;

/// Distance a hit point is pushed along its normal before spawning
/// secondary rays.
pub const SURFACE_EPSILON: f64 = 0.01;

/// Squared distance from the world origin past which a bounce contributes black.
pub const MAX_DISTANCE_SQUARED: f64 = 1e10;

/// A scene: primitives lit by one point light, seen through one camera.
pub struct Scene {
    primitives: Vec<Box<dyn Primitive>>,
    light: Light,
    camera: Camera,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(light: Light, camera: Camera) -> Self {
        Self {
            primitives: Vec::new(),
            light,
            camera,
        }
    }

    /// Add a primitive, builder style.
    pub fn with_primitive(mut self, primitive: impl Primitive + 'static) -> Self {
        self.add(Box::new(primitive));
        self
    }

    /// Add a primitive.
    pub fn add(&mut self, primitive: Box<dyn Primitive>) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Find the primitive hit closest to the ray origin.
    ///
    /// Scans every primitive; ties keep the first one in insertion order.
    pub fn intersect_nearest(&self, ray: &Ray) -> Option<(&dyn Primitive, Intersection)> {
        let mut nearest: Option<(&dyn Primitive, f64)> = None;

        for primitive in &self.primitives {
            let Some(t) = primitive.intersect(ray) else {
                continue;
            };
            if t < 0.0 {
                continue;
            }
            if nearest.map_or(true, |(_, closest)| t < closest) {
                nearest = Some((primitive.as_ref(), t));
            }
        }

        nearest.map(|(primitive, t)| (primitive, Intersection::new(ray, t, primitive)))
    }

    /// Whether anything sits between `point` and the light.
    ///
    /// `point` should already be lifted off its surface.
    pub fn is_in_shadow(&self, point: DVec3, light_dir: DVec3, light_dist_squared: f64) -> bool {
        let probe = Ray::new(point, light_dir);

        self.primitives.iter().any(|primitive| {
            primitive
                .intersect(&probe)
                .is_some_and(|t| t * t < light_dist_squared)
        })
    }

    /// Light arriving directly from the point light at a surface point.
    pub fn direct_light(&self, point: DVec3, normal: DVec3, material: &Material) -> Color {
        let to_light = self.light.origin - point;
        let dist_squared = to_light.length_squared();
        let Some(light_dir) = to_light.try_normalize() else {
            return Color::ZERO;
        };

        if self.is_in_shadow(point, light_dir, dist_squared) {
            return Color::ZERO;
        }

        let cos_theta = normal.dot(light_dir).max(0.0);
        let irradiance = cos_theta * self.light.intensity / (2.0 * PI * dist_squared);
        material.color * irradiance
    }

    /// Compute the color carried back along a ray.
    ///
    /// Mirrors and transparent surfaces forward the ray while bounces remain;
    /// everything else gets direct light plus, with `include_diffuse`, one
    /// cosine-weighted indirect sample. Every recursive call spends one bounce.
    /// The result is not clamped.
    pub fn get_color(
        &self,
        ray: &Ray,
        bounces: u32,
        include_diffuse: bool,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some((primitive, hit)) = self.intersect_nearest(ray) else {
            return Color::ZERO;
        };

        let point = hit.point + hit.normal * SURFACE_EPSILON;
        if point.length_squared() > MAX_DISTANCE_SQUARED {
            log::trace!("Dropping runaway ray at {}", point);
            return Color::ZERO;
        }

        let material = primitive.material();

        if material.specular && bounces > 0 {
            let reflected = ray.reflect(point, hit.normal);
            return self.get_color(&reflected, bounces - 1, include_diffuse, rng);
        }

        if material.is_refractive() && bounces > 0 {
            let refracted = ray.refract(point, hit.normal, material.refractive_index);
            return self.get_color(&refracted, bounces - 1, include_diffuse, rng);
        }

        let mut local = Color::ZERO;
        if include_diffuse && bounces > 0 {
            let bounce = Ray::diffuse_bounce(point, hit.normal, rng);
            local += self.get_color(&bounce, bounces - 1, include_diffuse, rng);
        }

        local + self.direct_light(point, hit.normal, material)
    }

    /// Render one region of the image. See [`render_region`].
    pub fn render_region(&self, region: &Region, config: &RenderConfig) -> RenderResult<RegionResult> {
        render_region(region, self, config)
    }
}
