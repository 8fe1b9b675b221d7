//! Scroll module: Touch momentum for the surface's scroll region.
//!
//! [`GestureSource`] strategies turn pointer or legacy touch events into
//! [`GestureSample`]s, and [`KineticScroller`] turns samples into scroll
//! steps and post-release inertia.

mod gesture;
mod kinetic;

pub use gesture::{gesture_source, GestureSample, GestureSource, PointerGestures, TouchGestures};
pub use kinetic::{KineticConfig, KineticScroller, Phase};
