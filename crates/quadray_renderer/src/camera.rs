//! Pinhole camera for primary ray generation.

use crate::{error::RenderError, RenderResult, Ray};
use quadray_math::{gaussian_offset, DVec3};
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Tolerance used when checking the view basis.
const BASIS_TOLERANCE: f64 = 1e-6;

/// Camera for generating rays into the scene.
///
/// `forward` points from the scene back toward the viewer, so primary rays
/// travel along `-forward`. Image columns advance along `right` and image
/// rows along `up`.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    focus: DVec3,
    fov: f64, // Horizontal field of view in radians

    // View basis
    forward: DVec3,
    up: DVec3,
    right: DVec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            focus: DVec3::new(0.0, 0.0, 55.0),
            fov: 90.0_f64.to_radians(),
            forward: DVec3::Z,
            up: DVec3::Y,
            right: DVec3::X,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the focal point all primary rays start from.
    pub fn with_focus(mut self, focus: DVec3) -> Self {
        self.focus = focus;
        self
    }

    /// Set the field of view, in radians.
    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    /// Set the view basis. The three vectors must be orthonormal.
    pub fn with_basis(mut self, forward: DVec3, up: DVec3, right: DVec3) -> Self {
        self.forward = forward;
        self.up = up;
        self.right = right;
        self
    }

    pub fn focus(&self) -> DVec3 {
        self.focus
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Check the resolution, field of view and basis.
    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidCamera(format!(
                "image size {}x{} is empty",
                self.image_width, self.image_height
            )));
        }

        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(RenderError::InvalidCamera(format!(
                "field of view {} rad is outside (0, pi)",
                self.fov
            )));
        }

        let basis = [self.forward, self.up, self.right];
        let unit = basis
            .iter()
            .all(|v| (v.length() - 1.0).abs() < BASIS_TOLERANCE);
        let orthogonal = self.forward.dot(self.up).abs() < BASIS_TOLERANCE
            && self.forward.dot(self.right).abs() < BASIS_TOLERANCE
            && self.up.dot(self.right).abs() < BASIS_TOLERANCE;
        if !unit || !orthogonal {
            return Err(RenderError::InvalidCamera(
                "view basis is not orthonormal".to_string(),
            ));
        }

        Ok(())
    }

    /// Distance from the focus to the image plane, in pixels.
    pub fn focal_distance(&self) -> f64 {
        (self.image_width as f64 / 2.0) / (self.fov / 2.0).tan()
    }

    /// Primary ray through pixel (x, y) shifted by a sub-pixel offset (u, v).
    pub fn primary_ray(&self, x: u32, y: u32, u: f64, v: f64) -> Ray {
        let w = self.image_width as f64;
        let h = self.image_height as f64;

        let direction = self.right * (x as f64 - w / 2.0 - 0.5 + u)
            + self.up * (y as f64 - h / 2.0 - 0.5 + v)
            - self.forward * self.focal_distance();

        Ray::new(self.focus, direction)
    }

    /// Unjittered ray through pixel (x, y).
    pub fn center_ray(&self, x: u32, y: u32) -> Ray {
        self.primary_ray(x, y, 0.0, 0.0)
    }

    /// Generate a ray for pixel (x, y) with Gaussian anti-aliasing jitter.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        // gen() is in [0, 1); flip it so the logarithm never sees zero
        let r1 = 1.0 - rng.gen::<f64>();
        let r2 = rng.gen::<f64>();
        let offset = gaussian_offset(r1, r2);

        self.primary_ray(x, y, offset.x, offset.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
