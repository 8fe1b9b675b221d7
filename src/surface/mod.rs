//! Surface: The rendering-surface contract.
//!
//! A surface interprets escape sequences, keeps a character grid and a
//! scrollable history, and turns keystrokes into bytes for the remote
//! process. The viewport's controllers only talk to it through these
//! traits, so any emulator can sit behind them. [`VtSurface`] is the
//! bundled `vt100` implementation.

mod keys;
mod vt;

#[cfg(test)]
pub(crate) mod testing;

pub use keys::{encode_key, encode_paste};
pub use vt::VtSurface;

use crate::actor::{KeyInput, PointerId};
use crate::config::FontConfig;
use crate::error::SurfaceError;
use crate::layout::{GridSize, PixelSize};
use crate::theme::Theme;

/// Completion callback for [`Surface::write`].
pub type WriteDone = Box<dyn FnOnce() + Send + 'static>;

/// A vertically scrollable region measured in pixels.
///
/// `scroll_top` grows toward newer content; `scroll_top == max_scroll_top()`
/// is the live bottom.
pub trait ScrollRegion {
    /// Current scroll offset from the top.
    fn scroll_top(&self) -> f64;

    /// Set the scroll offset. Implementations clamp to `[0, max_scroll_top]`.
    fn set_scroll_top(&mut self, top: f64);

    /// Total height of the scrollable content.
    fn scroll_height(&self) -> f64;

    /// Height of the visible part.
    fn client_height(&self) -> f64;

    /// Largest valid scroll offset.
    fn max_scroll_top(&self) -> f64 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }
}

/// A stateful text rendering surface.
pub trait Surface: ScrollRegion {
    /// Feed output to the surface.
    ///
    /// `done` must be called exactly once when the surface has consumed
    /// `data`, even if it was dropped because the surface is disposed.
    /// Callers must not issue another write before that.
    fn write(&mut self, data: &str, done: WriteDone);

    /// Discard all rendered state.
    fn reset(&mut self);

    /// Current character grid.
    fn grid(&self) -> GridSize;

    /// Recompute the grid from an available pixel area.
    fn fit(&mut self, area: PixelSize) -> Result<GridSize, SurfaceError>;

    /// Give the surface keyboard focus.
    fn focus(&mut self);

    /// Tear the surface down. Later calls become no-ops.
    fn dispose(&mut self);

    /// Whether [`Surface::dispose`] has been called.
    fn is_disposed(&self) -> bool;

    /// Input data for a keystroke, if the key produces any.
    fn key_input(&mut self, key: &KeyInput) -> Option<String>;

    /// Input data for pasted text.
    fn paste_input(&mut self, text: &str) -> Option<String> {
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Change font in place.
    fn set_font(&mut self, font: &FontConfig);

    /// Change theme in place.
    fn set_theme(&mut self, theme: &Theme);

    /// Tell the surface whether an external engine drives touch scrolling.
    fn set_kinetic_scroll(&mut self, _enabled: bool) {}

    /// Route all further events of `pointer` to this surface.
    fn capture_pointer(&mut self, _pointer: PointerId) {}

    /// Undo [`Surface::capture_pointer`].
    fn release_pointer(&mut self, _pointer: PointerId) {}
}
