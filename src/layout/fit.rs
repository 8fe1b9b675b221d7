//! Resize Coordinator: Keeps the character grid in step with its container.
//!
//! The coordinator remembers the container's last measured bounding box.
//! A fit asks the surface to recompute its grid from that box and reports
//! the result; anything that goes wrong along the way skips the fit and
//! waits for the next trigger.

use super::size::{GridSize, PixelSize};
use crate::surface::Surface;
use log::{debug, trace};

/// Minimum container extent, in pixels per axis, for a reliable fit.
pub const MIN_FIT_EXTENT: f64 = 24.0;

/// Why a fit did not produce a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSkip {
    /// The container has not been measured yet.
    NotLaidOut,
    /// The container is below [`MIN_FIT_EXTENT`] on some axis.
    TooSmall,
    /// The surface refused (e.g. mid-teardown).
    SurfaceUnavailable,
}

/// Observes container sizes and drives grid fits.
#[derive(Debug, Default)]
pub struct ResizeCoordinator {
    container: Option<PixelSize>,
    last_grid: Option<GridSize>,
}

impl ResizeCoordinator {
    /// Create a coordinator with no measurement yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new container measurement.
    pub fn observe(&mut self, size: PixelSize) {
        trace!("resize: container observed {size:?}");
        self.container = Some(size);
    }

    /// The last measured container size.
    pub const fn container(&self) -> Option<PixelSize> {
        self.container
    }

    /// The grid reported by the last successful fit.
    pub const fn last_grid(&self) -> Option<GridSize> {
        self.last_grid
    }

    /// Fit the surface to the container.
    ///
    /// Returns the new grid, which the caller reports to its resize
    /// callback. Failures are never fatal.
    pub fn fit<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<GridSize, FitSkip> {
        let Some(area) = self.container else {
            return Err(FitSkip::NotLaidOut);
        };
        if !area.at_least(MIN_FIT_EXTENT) {
            trace!("resize: skipping fit, container {area:?} too small");
            return Err(FitSkip::TooSmall);
        }
        match surface.fit(area) {
            Ok(grid) => {
                if self.last_grid != Some(grid) {
                    debug!("resize: fit {area:?} -> {grid:?}");
                }
                self.last_grid = Some(grid);
                Ok(grid)
            }
            Err(e) => {
                debug!("resize: fit skipped: {e}");
                Err(FitSkip::SurfaceUnavailable)
            }
        }
    }

    /// Forget the last reported grid (used on teardown).
    pub fn clear(&mut self) {
        self.last_grid = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use crate::surface::Surface;

    #[test]
    fn test_fit_requires_measurement() {
        let mut surface = RecordingSurface::new();
        let mut coordinator = ResizeCoordinator::new();
        assert_eq!(coordinator.fit(&mut surface), Err(FitSkip::NotLaidOut));
        assert_eq!(surface.fit_calls(), 0);
    }

    #[test]
    fn test_fit_guard() {
        let mut surface = RecordingSurface::new();
        let mut coordinator = ResizeCoordinator::new();

        coordinator.observe(PixelSize::new(20.0, 20.0));
        assert_eq!(coordinator.fit(&mut surface), Err(FitSkip::TooSmall));
        assert_eq!(surface.fit_calls(), 0);

        coordinator.observe(PixelSize::new(400.0, 20.0));
        assert_eq!(coordinator.fit(&mut surface), Err(FitSkip::TooSmall));
        assert_eq!(surface.fit_calls(), 0);

        coordinator.observe(PixelSize::new(30.0, 30.0));
        assert!(coordinator.fit(&mut surface).is_ok());
        assert_eq!(surface.fit_calls(), 1);
    }

    #[test]
    fn test_fit_reports_grid() {
        let mut surface = RecordingSurface::new();
        let mut coordinator = ResizeCoordinator::new();
        coordinator.observe(PixelSize::new(800.0, 480.0));

        let grid = coordinator.fit(&mut surface).unwrap();
        assert_eq!(grid, surface.grid());
        assert_eq!(coordinator.last_grid(), Some(grid));
    }

    #[test]
    fn test_fit_swallows_surface_errors() {
        let mut surface = RecordingSurface::new();
        surface.dispose();
        let mut coordinator = ResizeCoordinator::new();
        coordinator.observe(PixelSize::new(800.0, 480.0));

        assert_eq!(coordinator.fit(&mut surface), Err(FitSkip::SurfaceUnavailable));
        assert_eq!(coordinator.last_grid(), None);
    }
}
