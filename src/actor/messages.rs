//! Message types for actor communication.
//!
//! These enums define the protocol between the host threads and the
//! viewport, and between the viewport and whatever transport carries the
//! remote process's bytes.

use crate::layout::GridSize;
use crate::stream::SessionId;

/// Key codes for keyboard input.
///
/// This is a simplified subset of crossterm's KeyCode, covering the keys
/// a remote shell needs to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// A single keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during keypress.
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    /// A keystroke without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Identifier of a logical pointer (finger, pen, or mouse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// What kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A finger on a touch screen.
    Touch,
    /// A pen or stylus.
    Pen,
    /// A mouse.
    Mouse,
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Pointer pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Pointer released.
    Up,
    /// The platform took the pointer away.
    Cancel,
}

/// A pointer sample in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer.
    pub pointer_id: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Event phase.
    pub phase: PointerPhase,
    /// X coordinate in pixels.
    pub x: f64,
    /// Y coordinate in pixels.
    pub y: f64,
    /// Event time in milliseconds.
    pub timestamp_ms: f64,
}

/// Legacy touch event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A finger touched down.
    Start,
    /// Fingers moved.
    Move,
    /// A finger lifted.
    End,
    /// The platform cancelled the touch sequence.
    Cancel,
}

/// One finger of a legacy touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Touch identifier.
    pub id: u32,
    /// X coordinate in pixels.
    pub x: f64,
    /// Y coordinate in pixels.
    pub y: f64,
}

/// A legacy touch event, carrying every finger currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Event phase.
    pub phase: TouchPhase,
    /// Fingers still touching the surface.
    pub touches: Vec<TouchPoint>,
    /// Event time in milliseconds.
    pub timestamp_ms: f64,
}

/// Events delivered to a viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyInput),

    /// Pointer input (mouse, pen, or touch through the pointer API).
    Pointer(PointerEvent),

    /// Legacy touch input.
    Touch(TouchEvent),

    /// Mouse wheel scroll, in pixels (positive = toward newer output).
    Wheel {
        /// Vertical delta in pixels.
        delta_y: f64,
    },

    /// Host terminal was resized.
    Resize {
        /// New width in columns.
        cols: u16,
        /// New height in rows.
        rows: u16,
    },

    /// Focus gained.
    FocusGained,

    /// Focus lost.
    FocusLost,

    /// Paste event (bracketed paste).
    Paste(String),

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

/// Events from the transport carrying the remote process's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// New output appended to the current session.
    Output(String),

    /// The session's output was replaced wholesale (e.g. after a reconnect).
    Replace(Vec<String>),

    /// A different session is now attached.
    Session(SessionId),

    /// The transport closed.
    Closed,
}

/// Messages from the viewport back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    /// Bytes typed by the user.
    Input(String),

    /// The grid was refit.
    Resize(GridSize),
}
