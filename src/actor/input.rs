//! Input Actor: Dedicated thread for polling terminal events.
//!
//! The actor polls crossterm and translates what it reads into viewport
//! [`InputEvent`]s. Terminal hosts have no touch screen, so a left-button
//! mouse drag is reported as a pointer of kind [`PointerKind::Mouse`]
//! with pixel coordinates derived from the cell metrics; the viewport's
//! gesture source decides whether that counts as touch.

use super::messages::{
    InputEvent, KeyCode, KeyInput, KeyModifiers, PointerEvent, PointerId, PointerKind, PointerPhase,
};
use crate::layout::CellMetrics;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Rows scrolled per wheel notch.
const WHEEL_ROWS: f64 = 3.0;

/// The terminal mouse is a single pointer.
const MOUSE_POINTER: PointerId = PointerId(0);

/// Translates crossterm events into viewport input.
///
/// Timestamps are milliseconds since `epoch`, the same clock the frame
/// clock uses.
#[derive(Debug, Clone, Copy)]
pub struct EventTranslator {
    metrics: CellMetrics,
    epoch: Instant,
}

impl EventTranslator {
    /// Create a translator for cells of `metrics`.
    pub const fn new(metrics: CellMetrics, epoch: Instant) -> Self {
        Self { metrics, epoch }
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Convert a crossterm event. `None` for events the viewport ignores.
    pub fn translate(&self, event: Event) -> Option<InputEvent> {
        self.translate_at(event, self.now_ms())
    }

    /// Convert a crossterm event observed at `timestamp_ms`.
    pub fn translate_at(&self, event: Event, timestamp_ms: f64) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only presses produce input; releases and repeats are noise.
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(InputEvent::Key(KeyInput {
                    code: convert_key_code(key_event.code)?,
                    modifiers: convert_modifiers(key_event.modifiers),
                }))
            }
            Event::Mouse(mouse) => self.convert_mouse(mouse, timestamp_ms),
            Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
            Event::FocusGained => Some(InputEvent::FocusGained),
            Event::FocusLost => Some(InputEvent::FocusLost),
            Event::Paste(text) => Some(InputEvent::Paste(text)),
        }
    }

    fn convert_mouse(&self, mouse: event::MouseEvent, timestamp_ms: f64) -> Option<InputEvent> {
        let phase = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerPhase::Down,
            MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerPhase::Up,
            // Wheel up reveals older output.
            MouseEventKind::ScrollUp => {
                return Some(InputEvent::Wheel {
                    delta_y: -WHEEL_ROWS * self.metrics.height,
                })
            }
            MouseEventKind::ScrollDown => {
                return Some(InputEvent::Wheel {
                    delta_y: WHEEL_ROWS * self.metrics.height,
                })
            }
            _ => return None,
        };
        Some(InputEvent::Pointer(PointerEvent {
            pointer_id: MOUSE_POINTER,
            kind: PointerKind::Mouse,
            phase,
            x: (f64::from(mouse.column) + 0.5) * self.metrics.width,
            y: (f64::from(mouse.row) + 0.5) * self.metrics.height,
            timestamp_ms,
        }))
    }
}

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long a shutdown request can go unnoticed.
    pub fn spawn(
        sender: Sender<InputEvent>,
        translator: EventTranslator,
        poll_timeout: Duration,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("streamview-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &translator, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(
        sender: &Sender<InputEvent>,
        translator: &EventTranslator,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input) = translator.translate(event) {
                            if sender.send(input).is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}
