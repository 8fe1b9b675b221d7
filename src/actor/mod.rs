//! Actor Model: The terminal host around a viewport.
//!
//! The viewport itself is single-threaded. The host gives it a terminal
//! to live in: one thread polls input, one paces animation frames, and
//! the engine's loop owns the viewport and multiplexes everything with
//! `select!`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐   HostMessage
//! │ Input Thread │ ─────────────────▶  │              │ ─────────────▶ transport
//! └──────────────┘                     │    Engine    │
//! ┌──────────────┐       Frame         │  (Viewport)  │ TransportEvent
//! │ Frame Clock  │ ─────────────────▶  │              │ ◀───────────── transport
//! └──────────────┘                     └──────────────┘
//!                                             │ ScreenPainter
//!                                             ▼
//!                                          stdout
//! ```

mod engine;
mod input;
mod messages;
mod ticker;

pub use engine::{Engine, EngineConfig};
pub use input::{EventTranslator, InputActor};
pub use messages::{
    HostMessage, InputEvent, KeyCode, KeyInput, KeyModifiers, PointerEvent, PointerId, PointerKind,
    PointerPhase, TouchEvent, TouchPhase, TouchPoint, TransportEvent,
};
pub use ticker::{Frame, FrameClock};
