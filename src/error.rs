//! Error types.
//!
//! Nothing in the viewport core is fatal: surface errors are reported so
//! controllers can log them and carry on, and configuration errors only
//! surface from explicit loading.

use std::path::PathBuf;
use thiserror::Error;

/// A transient failure reported by a rendering surface.
///
/// Controllers treat it as "do nothing this cycle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface has been (or is being) torn down.
    #[error("rendering surface has been disposed")]
    Disposed,
}

/// Failure to load a [`ViewportConfig`](crate::config::ViewportConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The theme name does not match a built-in theme.
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

/// Failure to start or run the terminal host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Terminal setup, painting, or thread spawning failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The viewport config is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
