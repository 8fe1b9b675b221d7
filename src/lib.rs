//! # Streamview
//!
//! A live terminal viewport for the output of a remote process.
//!
//! Output arrives as an ordered, growing sequence of chunks. Streamview
//! keeps a rendering surface in sync with that sequence, sizes the
//! surface's character grid to its container, and adds inertial touch
//! scrolling on top of the surface's scrollback.
//!
//! ## Core Concepts
//!
//! - **Write queue**: One write in flight, at most one pending, never a
//!   nested completion
//! - **Reconciliation**: Append only what is new; replay when the store was
//!   replaced, rotated or cleared
//! - **Resize coordination**: Refit on container, font or theme changes,
//!   and skip silently when the container is not laid out
//! - **Kinetic scrolling**: Touch samples become scroll steps, then a
//!   decaying animation after release
//!
//! ## Example
//!
//! ```rust,ignore
//! use streamview::{gesture_source, Chunk, GridSize, PixelSize, Viewport, ViewportConfig, VtSurface};
//!
//! let config = ViewportConfig::default();
//! let surface = VtSurface::from_config(GridSize::new(80, 24), &config)?;
//! let mut viewport = Viewport::new(surface, config, gesture_source(true, false))
//!     .on_input(|data| send_to_process(data));
//!
//! viewport.observe_container(PixelSize::new(800.0, 600.0));
//! viewport.sync(&[Chunk::new(1, "hello\r\n")]);
//! viewport.run_pending();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod error;
pub mod layout;
pub mod sched;
pub mod scroll;
pub mod stream;
pub mod surface;
pub mod terminal;
pub mod theme;
pub mod viewport;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, HostMessage, InputEvent, KeyCode, KeyInput, KeyModifiers, TransportEvent};
pub use config::{ConfigChange, FontConfig, ViewportConfig};
pub use error::{ConfigError, HostError, SurfaceError};
pub use layout::{CellMetrics, FitSkip, GridSize, PixelSize, ResizeCoordinator};
pub use scroll::{gesture_source, GestureSource, KineticConfig, KineticScroller, Phase};
pub use stream::{Chunk, ChunkLog, DeliveryCursor, Reconciler, Reconciliation, SessionId, WriteQueue};
pub use surface::{ScrollRegion, Surface, VtSurface, WriteDone};
pub use theme::{Rgb, Theme};
pub use viewport::{Viewport, ViewportControl};
