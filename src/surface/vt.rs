//! VT surface: A `vt100`-backed rendering surface.
//!
//! The emulator keeps the screen and its scrollback in character rows;
//! this wrapper exposes that history as a pixel scroll region so the
//! kinetic scroll engine can drive it like any other scrollable area.

use super::{encode_key, encode_paste, ScrollRegion, Surface, WriteDone};
use crate::actor::{KeyInput, PointerId};
use crate::config::{FontConfig, ViewportConfig};
use crate::error::{ConfigError, SurfaceError};
use crate::layout::{CellMetrics, GridSize, PixelSize};
use crate::theme::Theme;
use log::{debug, trace};

/// Pixel slack when deciding whether the view is pinned to the bottom.
const PIN_EPSILON: f64 = 0.5;

/// A terminal emulator surface.
pub struct VtSurface {
    parser: vt100::Parser,
    grid: GridSize,
    scrollback_limit: usize,
    font: FontConfig,
    metrics: CellMetrics,
    theme: Theme,
    /// Rows of history currently held above the screen.
    history_rows: usize,
    scroll_top: f64,
    focused: bool,
    disposed: bool,
    kinetic_scroll: bool,
    captured: Option<PointerId>,
    needs_redraw: bool,
}

impl VtSurface {
    /// Create a surface with the given grid and scrollback length.
    pub fn new(grid: GridSize, font: FontConfig, theme: Theme, scrollback_limit: usize) -> Self {
        let metrics = font.metrics();
        Self {
            parser: vt100::Parser::new(grid.rows, grid.cols, scrollback_limit),
            grid,
            scrollback_limit,
            font,
            metrics,
            theme,
            history_rows: 0,
            scroll_top: 0.0,
            focused: false,
            disposed: false,
            kinetic_scroll: true,
            captured: None,
            needs_redraw: true,
        }
    }

    /// Create a surface from a viewport config.
    pub fn from_config(grid: GridSize, config: &ViewportConfig) -> Result<Self, ConfigError> {
        let mut surface = Self::new(
            grid,
            config.font(),
            config.resolve_theme()?,
            config.scrollback,
        );
        surface.kinetic_scroll = config.kinetic_scroll;
        Ok(surface)
    }

    /// The emulated screen, as currently scrolled.
    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }

    /// Plain-text contents of the visible screen.
    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Active theme.
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Active font.
    pub const fn font(&self) -> &FontConfig {
        &self.font
    }

    /// Cell metrics for the active font.
    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Whether the surface has keyboard focus.
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Drop keyboard focus.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether touch scrolling is driven by an external engine.
    pub const fn kinetic_scroll(&self) -> bool {
        self.kinetic_scroll
    }

    /// The pointer currently captured, if any.
    pub const fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }

    /// Rows of history above the screen.
    pub const fn history_rows(&self) -> usize {
        self.history_rows
    }

    /// Whether the view follows live output.
    pub fn is_pinned(&self) -> bool {
        self.max_scroll_top() - self.scroll_top < PIN_EPSILON
    }

    /// Scroll to the live bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.set_scroll_top(self.max_scroll_top());
    }

    /// Check if the surface changed since the last paint.
    pub const fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear the redraw flag after painting.
    pub fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    /// Re-measure how much history the view can reach.
    ///
    /// vt100 clamps the scrollback offset to the available history, so
    /// asking for the maximum offset reveals its length. Its visible-row
    /// window only holds while the offset is at most the screen height,
    /// so that is as far back as the view goes.
    fn refresh_history(&mut self) {
        let offset = self.parser.screen().scrollback();
        self.parser.set_scrollback(usize::MAX);
        let held = self.parser.screen().scrollback();
        self.parser.set_scrollback(offset);
        self.history_rows = held.min(usize::from(self.grid.rows));
    }

    /// Point the emulator's scrollback offset at `scroll_top`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sync_offset(&mut self) {
        let rows_from_bottom = ((self.max_scroll_top() - self.scroll_top) / self.metrics.height)
            .round()
            .max(0.0) as usize;
        self.parser.set_scrollback(rows_from_bottom.min(self.history_rows));
    }

    /// Re-derive history and scroll position after the content or grid changed.
    fn settle(&mut self, was_pinned: bool) {
        self.refresh_history();
        self.scroll_top = if was_pinned {
            self.max_scroll_top()
        } else {
            self.scroll_top.clamp(0.0, self.max_scroll_top())
        };
        self.sync_offset();
        self.needs_redraw = true;
    }
}

impl ScrollRegion for VtSurface {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: f64) {
        let top = top.clamp(0.0, self.max_scroll_top());
        if (top - self.scroll_top).abs() > f64::EPSILON {
            self.scroll_top = top;
            self.sync_offset();
            self.needs_redraw = true;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn scroll_height(&self) -> f64 {
        (self.history_rows as f64 + f64::from(self.grid.rows)) * self.metrics.height
    }

    fn client_height(&self) -> f64 {
        f64::from(self.grid.rows) * self.metrics.height
    }
}

impl Surface for VtSurface {
    fn write(&mut self, data: &str, done: WriteDone) {
        if self.disposed {
            trace!("vt: dropping {} bytes written after dispose", data.len());
        } else {
            let pinned = self.is_pinned();
            self.parser.process(data.as_bytes());
            self.settle(pinned);
            trace!("vt: wrote {} bytes, history {} rows", data.len(), self.history_rows);
        }
        done();
    }

    fn reset(&mut self) {
        if self.disposed {
            return;
        }
        debug!("vt: reset {:?}", self.grid);
        self.parser = vt100::Parser::new(self.grid.rows, self.grid.cols, self.scrollback_limit);
        self.history_rows = 0;
        self.scroll_top = 0.0;
        self.needs_redraw = true;
    }

    fn grid(&self) -> GridSize {
        self.grid
    }

    fn fit(&mut self, area: PixelSize) -> Result<GridSize, SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        let grid = self.metrics.grid_for(area);
        if grid != self.grid {
            let pinned = self.is_pinned();
            self.parser.set_size(grid.rows, grid.cols);
            self.grid = grid;
            self.settle(pinned);
        }
        Ok(grid)
    }

    fn focus(&mut self) {
        if !self.disposed {
            self.focused = true;
        }
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.focused = false;
        self.captured = None;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn key_input(&mut self, key: &KeyInput) -> Option<String> {
        if self.disposed {
            return None;
        }
        let data = encode_key(key, self.parser.screen().application_cursor())?;
        self.scroll_to_bottom();
        Some(data)
    }

    fn paste_input(&mut self, text: &str) -> Option<String> {
        if self.disposed {
            return None;
        }
        encode_paste(text, self.parser.screen().bracketed_paste())
    }

    fn set_font(&mut self, font: &FontConfig) {
        let pinned = self.is_pinned();
        self.font = font.clone();
        self.metrics = font.metrics();
        self.settle(pinned);
    }

    fn set_theme(&mut self, theme: &Theme) {
        self.theme = theme.clone();
        self.needs_redraw = true;
    }

    fn set_kinetic_scroll(&mut self, enabled: bool) {
        self.kinetic_scroll = enabled;
    }

    fn capture_pointer(&mut self, pointer: PointerId) {
        if !self.disposed {
            self.captured = Some(pointer);
        }
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        if self.captured == Some(pointer) {
            self.captured = None;
        }
    }
}
