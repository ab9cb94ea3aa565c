// Re-export glam for convenience
pub use glam::*;

// Quadray math helpers
mod frame;
mod quadratic;
mod sampling;

pub use frame::Frame;
pub use quadratic::resolve_quadratic;
pub use sampling::{cosine_hemisphere, gaussian_offset};
