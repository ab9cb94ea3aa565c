//! Region-based rendering.
//!
//! Divides the image into disjoint rectangles that are rendered
//! independently, each into its own buffer.

use crate::error::{RenderError, RenderResult};
use crate::renderer::{color_to_rgb, render_pixel, Rgb8};
use crate::{RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X coordinate of region's top-left corner
    pub x: u32,
    /// Y coordinate of region's top-left corner
    pub y: u32,
    /// Width of the region in pixels
    pub width: u32,
    /// Height of the region in pixels
    pub height: u32,
    /// Index of this region in the render order
    pub index: usize,
}

impl Region {
    /// Create a new region.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this region.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// How the image is split into regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Partition {
    /// An even `columns` x `rows` grid, one region per cell.
    Grid { columns: u32, rows: u32 },
    /// Square tiles of `size` pixels, rendered from the center outward.
    Buckets { size: u32 },
}

impl Default for Partition {
    /// Four quadrants.
    fn default() -> Self {
        Partition::Grid {
            columns: 2,
            rows: 2,
        }
    }
}

impl Partition {
    pub fn validate(&self) -> RenderResult<()> {
        match *self {
            Partition::Grid { columns, rows } if columns == 0 || rows == 0 => Err(
                RenderError::InvalidConfig(format!("partition grid {columns}x{rows} is empty")),
            ),
            Partition::Buckets { size: 0 } => Err(RenderError::InvalidConfig(
                "bucket size must be nonzero".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Split a `width` x `height` image into regions.
    pub fn regions(&self, width: u32, height: u32) -> Vec<Region> {
        match *self {
            Partition::Grid { columns, rows } => generate_grid(width, height, columns, rows),
            Partition::Buckets { size } => generate_buckets(width, height, size),
        }
    }
}

/// Split an image into an even grid of regions, in row-major order.
///
/// Columns and rows are capped at the image size so no region is empty;
/// leftover pixels go to the later cells.
pub fn generate_grid(width: u32, height: u32, columns: u32, rows: u32) -> Vec<Region> {
    let columns = columns.min(width).max(1);
    let rows = rows.min(height).max(1);
    let mut regions = Vec::with_capacity((columns * rows) as usize);

    for row in 0..rows {
        let y0 = split(height, rows, row);
        let y1 = split(height, rows, row + 1);
        for column in 0..columns {
            let x0 = split(width, columns, column);
            let x1 = split(width, columns, column + 1);
            let index = regions.len();
            regions.push(Region::new(x0, y0, x1 - x0, y1 - y0, index));
        }
    }

    regions
}

/// Boundary of cell `i` when splitting `extent` into `cells` parts.
fn split(extent: u32, cells: u32, i: u32) -> u32 {
    (extent as u64 * i as u64 / cells as u64) as u32
}

/// Generate square buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the center come first, so the most visually important
/// part of the image finishes early.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Region> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Region::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort regions by distance from image center.
fn sort_spiral(regions: &mut [Region], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance = |r: &Region| {
        let cx = r.x as f64 + r.width as f64 / 2.0;
        let cy = r.y as f64 + r.height as f64 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    regions.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Per-pixel seed for reproducible renders.
///
/// Depends only on the image coordinates, so the same pixel gets the same
/// samples whatever region it lands in.
fn pixel_seed(seed: u64, x: u32, y: u32) -> u64 {
    let pixel = ((y as u64) << 32) | x as u64;
    seed ^ pixel.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render a single region to a buffer of 8-bit pixels.
///
/// Returns pixels in row-major order within the region. Fails on the first
/// pixel whose color is not finite.
pub fn render_region(
    region: &Region,
    scene: &Scene,
    config: &RenderConfig,
) -> RenderResult<RegionResult> {
    let mut pixels = Vec::with_capacity(region.pixel_count());
    let mut region_rng = StdRng::from_entropy();

    for local_y in 0..region.height {
        for local_x in 0..region.width {
            let x = region.x + local_x;
            let y = region.y + local_y;

            let mut pixel_rng;
            let rng: &mut dyn RngCore = match config.seed {
                Some(seed) => {
                    pixel_rng = StdRng::seed_from_u64(pixel_seed(seed, x, y));
                    &mut pixel_rng
                }
                None => &mut region_rng,
            };

            let color = render_pixel(scene, x, y, config, rng);
            if !color.is_finite() {
                return Err(RenderError::NonFinitePixel { x, y });
            }
            pixels.push(color_to_rgb(color));
        }
    }

    Ok(RegionResult::new(*region, pixels))
}

/// Result of rendering a region.
#[derive(Debug, Clone)]
pub struct RegionResult {
    /// The region that was rendered
    pub region: Region,
    /// Pixel values in row-major order
    pub pixels: Vec<Rgb8>,
}

impl RegionResult {
    /// Create a new region result.
    pub fn new(region: Region, pixels: Vec<Rgb8>) -> Self {
        Self { region, pixels }
    }
}
