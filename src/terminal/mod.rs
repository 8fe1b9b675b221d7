//! Terminal output for the bundled host.

mod guard;
mod output;

pub use guard::{TerminalGuard, TerminalSetup};
pub use output::ScreenPainter;
