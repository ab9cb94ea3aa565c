//! Errors surfaced by the render driver.

use thiserror::Error;

/// Errors that can occur while setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Region {x},{y} {width}x{height} does not fit a {frame_width}x{frame_height} frame")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Non-finite color at pixel ({x}, {y})")]
    NonFinitePixel { x: u32, y: u32 },

    #[error("Worker for region {region} failed: {message}")]
    WorkerFailed { region: usize, message: String },
}

pub type RenderResult<T> = Result<T, RenderError>;
