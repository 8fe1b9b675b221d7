//! Gesture sources: Raw input events to gesture samples.
//!
//! Platforms deliver touches either through a unified pointer API or
//! through legacy touch events. Both feed the same kinematics; only the
//! plumbing differs, so each is a [`GestureSource`] strategy chosen once
//! when the viewport is built.

use crate::actor::{InputEvent, PointerId, PointerKind, PointerPhase, TouchPhase};

/// A sample for the kinetic engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSample {
    /// A single finger went down.
    Press {
        /// Pointer to capture, when the platform supports capture.
        pointer: Option<PointerId>,
        /// Y coordinate in pixels.
        y: f64,
        /// Event time in milliseconds.
        timestamp_ms: f64,
    },
    /// The tracked finger moved.
    Move {
        /// Y coordinate in pixels.
        y: f64,
        /// Event time in milliseconds.
        timestamp_ms: f64,
    },
    /// The tracked finger lifted.
    Release {
        /// Pointer to release, if one was captured.
        pointer: Option<PointerId>,
        /// Event time in milliseconds.
        timestamp_ms: f64,
    },
    /// The gesture stopped being a single-finger scroll.
    Abort,
}

/// Turns platform input into gesture samples.
pub trait GestureSource {
    /// Translate an event. `None` means the event is not part of a gesture.
    fn sample(&mut self, event: &InputEvent) -> Option<GestureSample>;

    /// Forget any gesture in progress.
    fn reset(&mut self);

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Pick the gesture strategy for the current platform.
pub fn gesture_source(pointer_events: bool, mouse_as_touch: bool) -> Box<dyn GestureSource> {
    if pointer_events {
        Box::new(PointerGestures::new(mouse_as_touch))
    } else {
        Box::new(TouchGestures::new())
    }
}

/// Gestures from pointer events.
///
/// Only touch pointers take part (plus the mouse, when configured), and
/// once a pointer owns the gesture every other pointer is ignored.
#[derive(Debug, Clone, Default)]
pub struct PointerGestures {
    active: Option<PointerId>,
    accept_mouse: bool,
}

impl PointerGestures {
    /// Create a pointer strategy.
    pub const fn new(accept_mouse: bool) -> Self {
        Self {
            active: None,
            accept_mouse,
        }
    }

    const fn accepts(&self, kind: PointerKind) -> bool {
        matches!(kind, PointerKind::Touch) || (self.accept_mouse && matches!(kind, PointerKind::Mouse))
    }
}

impl GestureSource for PointerGestures {
    fn sample(&mut self, event: &InputEvent) -> Option<GestureSample> {
        let InputEvent::Pointer(p) = event else {
            return None;
        };
        if !self.accepts(p.kind) {
            return None;
        }
        match p.phase {
            PointerPhase::Down => {
                if self.active.is_some() {
                    return None;
                }
                self.active = Some(p.pointer_id);
                Some(GestureSample::Press {
                    pointer: Some(p.pointer_id),
                    y: p.y,
                    timestamp_ms: p.timestamp_ms,
                })
            }
            PointerPhase::Move if self.active == Some(p.pointer_id) => Some(GestureSample::Move {
                y: p.y,
                timestamp_ms: p.timestamp_ms,
            }),
            PointerPhase::Up | PointerPhase::Cancel if self.active == Some(p.pointer_id) => {
                self.active = None;
                Some(GestureSample::Release {
                    pointer: Some(p.pointer_id),
                    timestamp_ms: p.timestamp_ms,
                })
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.active = None;
    }

    fn name(&self) -> &'static str {
        "pointer"
    }
}

/// Gestures from legacy touch events.
///
/// Multi-touch is not a scroll: a second finger aborts the gesture.
#[derive(Debug, Clone, Default)]
pub struct TouchGestures {
    tracking: bool,
}

impl TouchGestures {
    /// Create a touch strategy.
    pub const fn new() -> Self {
        Self { tracking: false }
    }
}

impl GestureSource for TouchGestures {
    fn sample(&mut self, event: &InputEvent) -> Option<GestureSample> {
        let InputEvent::Touch(t) = event else {
            return None;
        };
        match t.phase {
            TouchPhase::Start | TouchPhase::Move if t.touches.len() != 1 => {
                if self.tracking || t.phase == TouchPhase::Start {
                    self.tracking = false;
                    Some(GestureSample::Abort)
                } else {
                    None
                }
            }
            TouchPhase::Start => {
                self.tracking = true;
                Some(GestureSample::Press {
                    pointer: None,
                    y: t.touches[0].y,
                    timestamp_ms: t.timestamp_ms,
                })
            }
            TouchPhase::Move if self.tracking => Some(GestureSample::Move {
                y: t.touches[0].y,
                timestamp_ms: t.timestamp_ms,
            }),
            TouchPhase::End | TouchPhase::Cancel if self.tracking => {
                self.tracking = false;
                Some(GestureSample::Release {
                    pointer: None,
                    timestamp_ms: t.timestamp_ms,
                })
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.tracking = false;
    }

    fn name(&self) -> &'static str {
        "touch"
    }
}
