//! Sizes: Pixel areas, character grids, and the cell metrics between them.

/// A measured area in device-independent pixels.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PixelSize {
    /// Create a new pixel size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel area covered by a character grid.
    #[inline]
    pub fn of_grid(grid: GridSize, metrics: CellMetrics) -> Self {
        Self::new(
            f64::from(grid.cols) * metrics.width,
            f64::from(grid.rows) * metrics.height,
        )
    }

    /// Check if both dimensions are at least `min` pixels.
    #[inline]
    pub fn at_least(&self, min: f64) -> bool {
        self.width >= min && self.height >= min
    }
}

impl std::fmt::Debug for PixelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelSize({}x{})", self.width, self.height)
    }
}

/// A character grid size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridSize {
    /// Columns.
    pub cols: u16,
    /// Rows.
    pub rows: u16,
}

impl GridSize {
    /// Smallest grid a surface will fit to.
    pub const MIN: Self = Self::new(2, 1);

    /// Create a new grid size.
    #[inline]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl std::fmt::Debug for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GridSize({}x{})", self.cols, self.rows)
    }
}

/// Pixel dimensions of a single character cell.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CellMetrics {
    /// Cell width in pixels.
    pub width: f64,
    /// Cell height (line height) in pixels.
    pub height: f64,
}

impl CellMetrics {
    /// Monospace advance relative to font size.
    const ADVANCE: f64 = 0.6;
    /// Line height relative to font size.
    const LINE_HEIGHT: f64 = 1.2;

    /// Create cell metrics directly.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Approximate metrics for a monospace font of the given size.
    pub fn for_font_size(size: f32) -> Self {
        let size = f64::from(size.max(1.0));
        Self::new(size * Self::ADVANCE, (size * Self::LINE_HEIGHT).ceil())
    }

    /// Largest grid that fits in `area`, never smaller than [`GridSize::MIN`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn grid_for(&self, area: PixelSize) -> GridSize {
        let cols = (area.width / self.width).floor().clamp(0.0, f64::from(u16::MAX)) as u16;
        let rows = (area.height / self.height).floor().clamp(0.0, f64::from(u16::MAX)) as u16;
        GridSize::new(cols.max(GridSize::MIN.cols), rows.max(GridSize::MIN.rows))
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::for_font_size(14.0)
    }
}
