//! Render driver.
//!
//! Implements multi-sampled rendering with:
//! - A deterministic direct term per pixel plus averaged diffuse samples
//! - Gamma correction to 8-bit channels
//! - Parallel region rendering merged into one frame

use crate::error::{RenderError, RenderResult};
use crate::region::{render_region, Partition, Region, RegionResult};
use crate::{Color, Scene};
use bytemuck::{Pod, Zeroable};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Display gamma applied to every channel.
pub const GAMMA: f64 = 2.2;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Diffuse samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_bounces: u32,
    /// Whether to sample indirect diffuse light
    pub include_diffuse: bool,
    /// How the image is split between workers
    pub partition: Partition,
    /// Seed for reproducible sampling; `None` draws fresh entropy per region
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 50,
            max_bounces: 4,
            include_diffuse: true,
            partition: Partition::default(),
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Check the settings before a render starts.
    pub fn validate(&self) -> RenderResult<()> {
        if self.include_diffuse && self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "diffuse sampling needs at least one sample per pixel".to_string(),
            ));
        }
        self.partition.validate()
    }
}

/// An 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Apply display gamma to a linear channel value.
///
/// Negative values clamp to zero; there is no upper clamp.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    linear.max(0.0).powf(1.0 / GAMMA)
}

/// Convert a linear color to an 8-bit pixel.
///
/// Channels are gamma corrected, truncated, and saturated at 255.
pub fn color_to_rgb(color: Color) -> Rgb8 {
    let channel = |c: f64| linear_to_gamma(c).min(255.0) as u8;
    Rgb8::new(channel(color.x), channel(color.y), channel(color.z))
}

/// Compute the linear color of pixel (x, y).
///
/// The direct term is traced once along the unjittered pixel-center ray
/// without diffuse sampling. When diffuse sampling is on, the mean of
/// `samples_per_pixel` jittered samples is added on top.
pub fn render_pixel(
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let camera = scene.camera();
    let direct = scene.get_color(&camera.center_ray(x, y), config.max_bounces, false, rng);

    if !config.include_diffuse || config.samples_per_pixel == 0 {
        return direct;
    }

    let mut sum = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray adds a fresh Gaussian offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        sum += scene.get_color(&ray, config.max_bounces, true, rng);
    }

    direct + sum / config.samples_per_pixel as f64
}

/// A complete rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb8>,
}

impl Frame {
    /// Create a new frame filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb8::BLACK; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgb8) {
        let index = self.index(x, y);
        self.pixels[index] = pixel;
    }

    /// Copy a rendered region into its sub-rectangle.
    pub fn place_region(&mut self, result: &RegionResult) -> RenderResult<()> {
        let region = result.region;
        let fits = region.x as u64 + region.width as u64 <= self.width as u64
            && region.y as u64 + region.height as u64 <= self.height as u64
            && result.pixels.len() == region.pixel_count();
        if !fits {
            return Err(RenderError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                frame_width: self.width,
                frame_height: self.height,
            });
        }

        if region.width == 0 {
            return Ok(());
        }

        for (row, line) in result.pixels.chunks_exact(region.width as usize).enumerate() {
            let start = self.index(region.x, region.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }

        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Raw RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to an `image` buffer for encoding or display.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.get(x, y);
            image::Rgb([p.r, p.g, p.b])
        })
    }
}

/// Render the entire scene.
///
/// Every region is rendered on the rayon pool into its own buffer; once all
/// of them have come back they are placed into the frame. The first failing
/// region aborts the render.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<Frame> {
    config.validate()?;
    let camera = scene.camera();
    camera.validate()?;

    let (width, height) = (camera.image_width, camera.image_height);
    let regions = config.partition.regions(width, height);

    log::info!(
        "Rendering {}x{} in {} regions, {} primitives, diffuse={} spp={} bounces={}",
        width,
        height,
        regions.len(),
        scene.primitives().len(),
        config.include_diffuse,
        config.samples_per_pixel,
        config.max_bounces
    );
    let start = Instant::now();

    let results = regions
        .par_iter()
        .map(|region| render_region_guarded(region, scene, config))
        .collect::<RenderResult<Vec<_>>>()?;

    let mut frame = Frame::new(width, height);
    for result in &results {
        frame.place_region(result)?;
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(frame)
}

/// Render a region, turning a worker panic into an error.
fn render_region_guarded(
    region: &Region,
    scene: &Scene,
    config: &RenderConfig,
) -> RenderResult<RegionResult> {
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| render_region(region, scene, config)))
        .unwrap_or_else(|payload| {
            Err(RenderError::WorkerFailed {
                region: region.index,
                message: panic_message(payload.as_ref()),
            })
        });

    match &result {
        Ok(_) => log::debug!(
            "Region {} ({}x{} at {},{}) done in {:?}",
            region.index,
            region.width,
            region.height,
            region.x,
            region.y,
            start.elapsed()
        ),
        Err(err) => log::error!("Region {} failed: {}", region.index, err),
    }

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Hyperboloid, Light, Material, Primitive, Ray, Sphere};
    use quadray_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_scene() -> Scene {
        let camera = Camera::new().with_resolution(24, 18);
        Scene::new(Light::new(DVec3::new(-10.0, -20.0, 40.0), 1e8), camera)
            .with_primitive(Sphere::new(DVec3::new(0.0, -2.0, 25.0), 10.0, Material::default()))
            .with_primitive(Sphere::new(DVec3::new(12.0, 8.0, 5.0), 6.0, Material::mirror()))
            .with_primitive(Sphere::new(DVec3::new(-12.0, 8.0, 10.0), 5.0, Material::glass(1.5)))
            .with_primitive(Hyperboloid::new(
                DVec3::ZERO,
                DVec3::new(10.0, 20.0, 10.0),
                Material::diffuse(Color::new(1.0, 1.0, 0.0)),
            ))
            .with_primitive(Sphere::new(
                DVec3::new(0.0, 0.0, -1000.0),
                940.0,
                Material::diffuse(Color::new(0.0, 1.0, 1.0)),
            ))
    }

    fn direct_only(partition: Partition) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: 0,
            include_diffuse: false,
            partition,
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-5.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(2f64.powf(GAMMA)) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), Rgb8::BLACK);
        assert_eq!(color_to_rgb(Color::new(-1.0, 1.0, 1e9)), Rgb8::new(0, 1, 255));

        // 100^2.2 maps back to 100; truncation keeps 99 for anything just below
        assert_eq!(color_to_rgb(Color::splat(100f64.powf(GAMMA) * 1.0001)).r, 100);
        assert_eq!(color_to_rgb(Color::splat(100f64.powf(GAMMA) * 0.999)).r, 99);
    }

    #[test]
    fn test_config_validate() {
        assert!(RenderConfig::default().validate().is_ok());
        assert!(direct_only(Partition::default()).validate().is_ok());

        let no_samples = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(matches!(no_samples.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_json() {
        let config: RenderConfig = serde_json::from_str(
            r#"{
                "samples_per_pixel": 8,
                "partition": { "kind": "buckets", "size": 32 },
                "seed": 3
            }"#,
        )
        .unwrap();

        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.max_bounces, 4);
        assert!(config.include_diffuse);
        assert_eq!(config.partition, Partition::Buckets { size: 32 });
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_render_pixel_hits_lit_sphere() {
        let scene = test_scene();
        let mut rng = StdRng::seed_from_u64(42);
        let config = direct_only(Partition::default());

        // Center of the image looks at the white sphere
        let color = render_pixel(&scene, 12, 9, &config, &mut rng);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_direct_only_render_is_deterministic() {
        let scene = test_scene();
        let config = direct_only(Partition::default());

        let a = render(&scene, &config).unwrap();
        let b = render(&scene, &config).unwrap();
        assert_eq!(a, b);
        assert!(a.pixels.iter().any(|p| *p != Rgb8::BLACK));
    }

    #[test]
    fn test_quadrants_match_single_region() {
        let scene = test_scene();

        let whole = render(&scene, &direct_only(Partition::Grid { columns: 1, rows: 1 })).unwrap();
        let quadrants = render(&scene, &direct_only(Partition::Grid { columns: 2, rows: 2 })).unwrap();
        let buckets = render(&scene, &direct_only(Partition::Buckets { size: 5 })).unwrap();

        assert_eq!(whole, quadrants);
        assert_eq!(whole, buckets);
    }

    #[test]
    fn test_manual_quadrant_placement() {
        let scene = test_scene();
        let config = direct_only(Partition::Grid { columns: 1, rows: 1 });
        let whole = render(&scene, &config).unwrap();

        let mut frame = Frame::new(24, 18);
        for region in crate::generate_grid(24, 18, 2, 2) {
            let result = scene.render_region(&region, &config).unwrap();
            frame.place_region(&result).unwrap();
        }
        assert_eq!(frame, whole);
    }

    #[test]
    fn test_seeded_diffuse_render_is_partition_independent() {
        let scene = test_scene();
        let config = |partition| RenderConfig {
            samples_per_pixel: 2,
            max_bounces: 2,
            include_diffuse: true,
            partition,
            seed: Some(1234),
        };

        let whole = render(&scene, &config(Partition::Grid { columns: 1, rows: 1 })).unwrap();
        let quadrants = render(&scene, &config(Partition::Grid { columns: 2, rows: 2 })).unwrap();
        assert_eq!(whole, quadrants);
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let scene = Scene::new(Light::new(DVec3::ZERO, 1.0), Camera::new().with_resolution(0, 0));
        let result = render(&scene, &direct_only(Partition::default()));
        assert!(matches!(result, Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn test_non_finite_pixel_aborts_render() {
        let camera = Camera::new().with_resolution(4, 4);
        let scene = Scene::new(Light::new(DVec3::new(0.0, 0.0, 50.0), f64::NAN), camera)
            .with_primitive(Sphere::new(DVec3::ZERO, 40.0, Material::default()));

        let result = render(&scene, &direct_only(Partition::default()));
        assert!(matches!(result, Err(RenderError::NonFinitePixel { .. })));
    }

    struct Exploding(Material);

    impl Primitive for Exploding {
        fn intersect(&self, _ray: &Ray) -> Option<f64> {
            panic!("intersection blew up");
        }

        fn normal(&self, _point: DVec3) -> DVec3 {
            DVec3::Y
        }

        fn material(&self) -> &Material {
            &self.0
        }
    }

    #[test]
    fn test_worker_panic_surfaces_as_error() {
        let camera = Camera::new().with_resolution(4, 4);
        let scene = Scene::new(Light::new(DVec3::ZERO, 1.0), camera)
            .with_primitive(Exploding(Material::default()));

        match render(&scene, &direct_only(Partition::default())) {
            Err(RenderError::WorkerFailed { message, .. }) => {
                assert!(message.contains("blew up"));
            }
            other => panic!("expected a worker failure, got {other:?}"),
        }
    }

    #[test]
    fn test_place_region_out_of_bounds() {
        let mut frame = Frame::new(4, 4);
        let region = Region::new(2, 2, 4, 4, 0);
        let result = RegionResult::new(region, vec![Rgb8::BLACK; 16]);

        assert!(matches!(
            frame.place_region(&result),
            Err(RenderError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_frame_bytes_and_image() {
        let mut frame = Frame::new(2, 1);
        frame.set(1, 0, Rgb8::new(10, 20, 30));

        assert_eq!(frame.as_bytes(), &[0, 0, 0, 10, 20, 30]);

        let image = frame.to_rgb_image();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [10, 20, 30]);
    }
}
