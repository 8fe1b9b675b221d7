//! A scriptable surface for unit tests.

use super::{ScrollRegion, Surface, WriteDone};
use crate::actor::{KeyInput, PointerId};
use crate::config::FontConfig;
use crate::error::SurfaceError;
use crate::layout::{CellMetrics, GridSize, PixelSize};
use crate::theme::Theme;
use std::collections::VecDeque;

/// Everything a [`RecordingSurface`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write(String),
    Reset,
    Fit(GridSize),
    Focus,
    Dispose,
    Capture(PointerId),
    Release(PointerId),
    Font,
    Theme,
}

pub struct RecordingSurface {
    pub calls: Vec<Call>,
    /// Completion callbacks not yet fired.
    pending: VecDeque<WriteDone>,
    /// Fire completions inside `write`.
    pub auto_complete: bool,
    grid: GridSize,
    metrics: CellMetrics,
    disposed: bool,
    pub top: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pending: VecDeque::new(),
            auto_complete: false,
            grid: GridSize::new(80, 24),
            metrics: CellMetrics::new(8.0, 16.0),
            disposed: false,
            top: 0.0,
            content_height: 2000.0,
            viewport_height: 400.0,
        }
    }

    /// Fire the oldest outstanding completion. Returns false if none.
    pub fn complete_next(&mut self) -> bool {
        self.pending.pop_front().map(|done| done()).is_some()
    }

    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    pub fn writes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Write(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn fit_calls(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Fit(_))).count()
    }
}

impl ScrollRegion for RecordingSurface {
    fn scroll_top(&self) -> f64 {
        self.top
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.top = top.clamp(0.0, self.max_scroll_top());
    }

    fn scroll_height(&self) -> f64 {
        self.content_height
    }

    fn client_height(&self) -> f64 {
        self.viewport_height
    }
}

impl Surface for RecordingSurface {
    fn write(&mut self, data: &str, done: WriteDone) {
        self.calls.push(Call::Write(data.to_string()));
        if self.auto_complete {
            done();
        } else {
            self.pending.push_back(done);
        }
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }

    fn grid(&self) -> GridSize {
        self.grid
    }

    fn fit(&mut self, area: PixelSize) -> Result<GridSize, SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        self.grid = self.metrics.grid_for(area);
        self.calls.push(Call::Fit(self.grid));
        Ok(self.grid)
    }

    fn focus(&mut self) {
        self.calls.push(Call::Focus);
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.calls.push(Call::Dispose);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn key_input(&mut self, key: &KeyInput) -> Option<String> {
        super::encode_key(key, false)
    }

    fn set_font(&mut self, font: &FontConfig) {
        self.metrics = font.metrics();
        self.calls.push(Call::Font);
    }

    fn set_theme(&mut self, _theme: &Theme) {
        self.calls.push(Call::Theme);
    }

    fn capture_pointer(&mut self, pointer: PointerId) {
        self.calls.push(Call::Capture(pointer));
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        self.calls.push(Call::Release(pointer));
    }
}
