//! Surface materials.

use quadray_math::DVec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// How a surface responds to light.
///
/// A material is either a mirror (`specular`), a transparent boundary
/// (`refractive_index != 0`), or a diffuse surface lit by the point light.
/// Nothing prevents both flags being set; the mirror takes precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse color (RGB, 0-1)
    pub color: Color,
    /// Perfect mirror, no local term
    pub specular: bool,
    /// Index of refraction, 0 for opaque surfaces
    pub refractive_index: f64,
}

impl Material {
    /// Create a material from its raw properties.
    pub fn new(color: Color, specular: bool, refractive_index: f64) -> Self {
        Self {
            color,
            specular,
            refractive_index,
        }
    }

    /// An opaque diffuse surface.
    pub fn diffuse(color: Color) -> Self {
        Self::new(color, false, 0.0)
    }

    /// A perfect mirror.
    pub fn mirror() -> Self {
        Self::new(Color::ONE, true, 0.0)
    }

    /// A transparent surface with the given index of refraction
    /// (1.5 = glass, 1.33 = water).
    pub fn glass(refractive_index: f64) -> Self {
        Self::new(Color::ONE, false, refractive_index)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.refractive_index == 0.0
    }

    #[inline]
    pub fn is_refractive(&self) -> bool {
        !self.is_opaque()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::ONE)
    }
}
