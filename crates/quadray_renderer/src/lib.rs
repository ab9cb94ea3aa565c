//! Quadray renderer - CPU ray tracing of implicit quadrics.
//!
//! A recursive ray tracer for scenes of spheres and two-sheeted
//! hyperboloids lit by a single point light, with mirror reflection,
//! refraction, hard shadows and Monte Carlo indirect diffuse light.
//!
//! The image is split into regions rendered in parallel, each into its own
//! buffer, and the finished regions are placed into one [`Frame`].

mod camera;
mod error;
mod hyperboloid;
mod light;
mod material;
mod primitive;
mod ray;
mod region;
mod renderer;
mod scene;
mod sphere;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hyperboloid::Hyperboloid;
pub use light::Light;
pub use material::{Color, Material};
pub use primitive::{Intersection, Primitive};
pub use ray::{Ray, REFRACTION_OFFSET};
pub use region::{
    generate_buckets, generate_grid, render_region, Partition, Region, RegionResult,
};
pub use renderer::{
    color_to_rgb, linear_to_gamma, render, render_pixel, Frame, RenderConfig, Rgb8, GAMMA,
};
pub use scene::{Scene, MAX_DISTANCE_SQUARED, SURFACE_EPSILON};
pub use sphere::Sphere;

/// Re-export DVec3 and common math types from quadray_math
pub use quadray_math::{DVec2, DVec3};
