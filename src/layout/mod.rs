//! Layout module: Pixel geometry and grid fitting.
//!
//! The rendering surface lays text out on a character grid, but its
//! container is measured in pixels. [`CellMetrics`] converts between the
//! two and [`ResizeCoordinator`] decides when a refit is safe.

mod fit;
mod size;

pub use fit::{FitSkip, ResizeCoordinator, MIN_FIT_EXTENT};
pub use size::{CellMetrics, GridSize, PixelSize};
