//! Kinetic scroll engine: Inertial scrolling synthesized from touch samples.
//!
//! The surface's scroll region has no momentum of its own on touch input.
//! This engine turns a gesture's samples into immediate scroll steps while
//! the finger is down, and into a decaying animation after release.
//!
//! # States
//!
//! ```text
//!          press                  release, |v| >= min
//!  Idle ─────────▶ Tracking ─────────────────────────▶ Inertia
//!   ▲                 │ release, |v| < min                │
//!   │                 ▼                                   │
//!   └─────────────── Idle ◀──── boundary hit / decayed ───┘
//! ```
//!
//! A new press or [`KineticScroller::cancel`] always returns to a clean
//! state first.

use crate::actor::PointerId;
use crate::surface::ScrollRegion;
use log::trace;

/// Tuning knobs for the engine.
///
/// Distances are in pixels and times in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticConfig {
    /// Move samples smaller than this are jitter and ignored.
    pub jitter_floor: f64,
    /// Lower bound on the time between samples.
    pub min_sample_dt: f64,
    /// Scroll pixels per finger pixel for slow drags.
    pub base_multiplier: f64,
    /// Largest extra multiplier for fast flicks.
    pub max_boost: f64,
    /// Finger pixels per unit of boost.
    pub boost_divisor: f64,
    /// Weight of the newest sample in the velocity estimate.
    pub smoothing: f64,
    /// Velocity clamp, in px/ms.
    pub max_velocity: f64,
    /// Speeds at or below this do not carry inertia, in px/ms.
    pub min_velocity: f64,
    /// Linear deceleration, in px/ms per ms.
    pub deceleration: f64,
    /// Frame time used when a frame reports no elapsed time.
    pub frame_interval_estimate: f64,
}

impl Default for KineticConfig {
    fn default() -> Self {
        Self {
            jitter_floor: 1.0,
            min_sample_dt: 8.0,
            base_multiplier: 2.2,
            max_boost: 2.8,
            boost_divisor: 25.0,
            smoothing: 0.25,
            max_velocity: 8.0,
            min_velocity: 0.05,
            deceleration: 0.015,
            frame_interval_estimate: 16.0,
        }
    }
}

impl KineticConfig {
    /// Scroll pixels per finger pixel for a sample of `delta_y`.
    pub fn multiplier(&self, delta_y: f64) -> f64 {
        self.base_multiplier + self.max_boost.min(delta_y.abs() / self.boost_divisor)
    }

    /// Upper bound on inertia frames for a starting velocity, assuming
    /// frames arrive every `frame_interval` ms.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_inertia_frames(&self, velocity: f64, frame_interval: f64) -> u32 {
        (velocity.abs() / (self.deceleration * frame_interval)).ceil() as u32
    }
}

/// Where the engine is in a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No gesture.
    Idle,
    /// A finger is down and being followed.
    Tracking,
    /// Released; coasting on the remaining velocity.
    Inertia,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    last_frame_ms: f64,
}

/// Scroll kinematics for the current gesture.
#[derive(Debug, Clone, Copy, Default)]
struct Kinematics {
    last_position: Option<f64>,
    last_timestamp: Option<f64>,
    velocity: f64,
    animation: Option<Animation>,
    active_pointer: Option<PointerId>,
}

/// The kinetic scroll engine.
#[derive(Debug, Clone, Default)]
pub struct KineticScroller {
    config: KineticConfig,
    state: Kinematics,
}

impl KineticScroller {
    /// Create an idle engine with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle engine with custom tuning.
    pub fn with_config(config: KineticConfig) -> Self {
        Self {
            config,
            state: Kinematics::default(),
        }
    }

    /// Tuning in use.
    pub const fn config(&self) -> &KineticConfig {
        &self.config
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        if self.state.animation.is_some() {
            Phase::Inertia
        } else if self.state.last_position.is_some() {
            Phase::Tracking
        } else {
            Phase::Idle
        }
    }

    /// Smoothed velocity in px/ms (positive scrolls toward newer output).
    pub const fn velocity(&self) -> f64 {
        self.state.velocity
    }

    /// Pointer that owns the current gesture, if it came from the pointer API.
    pub const fn active_pointer(&self) -> Option<PointerId> {
        self.state.active_pointer
    }

    /// Whether an inertial animation wants frames.
    pub const fn is_animating(&self) -> bool {
        self.state.animation.is_some()
    }

    /// Start tracking a gesture, cancelling any inertia in progress.
    pub fn press(&mut self, pointer: Option<PointerId>, y: f64, timestamp_ms: f64) {
        self.cancel();
        self.state.last_position = Some(y);
        self.state.last_timestamp = Some(timestamp_ms);
        self.state.active_pointer = pointer;
    }

    /// Follow a move sample, scrolling `region` directly.
    ///
    /// Returns `true` if the sample was applied (it may still have been
    /// clamped at an edge), `false` if it was ignored.
    pub fn track<R: ScrollRegion + ?Sized>(&mut self, y: f64, timestamp_ms: f64, region: &mut R) -> bool {
        let (Some(last_y), Some(last_t)) = (self.state.last_position, self.state.last_timestamp) else {
            return false;
        };
        let delta_y = last_y - y;
        if delta_y.abs() < self.config.jitter_floor {
            return false;
        }
        let dt = (timestamp_ms - last_t).max(self.config.min_sample_dt);
        let scroll = delta_y * self.config.multiplier(delta_y);

        scroll_by(region, scroll);

        let instant = scroll / dt;
        let smoothing = self.config.smoothing;
        let velocity = self.state.velocity.mul_add(1.0 - smoothing, instant * smoothing);
        self.state.velocity = velocity.clamp(-self.config.max_velocity, self.config.max_velocity);
        self.state.last_position = Some(y);
        self.state.last_timestamp = Some(timestamp_ms);
        true
    }

    /// End the gesture. Returns the phase the engine moved to.
    pub fn release(&mut self, timestamp_ms: f64) -> Phase {
        if self.phase() != Phase::Tracking {
            return self.phase();
        }
        let velocity = self.state.velocity;
        if velocity.abs() < self.config.min_velocity {
            self.cancel();
            return Phase::Idle;
        }
        trace!("kinetic: release at {velocity:.3} px/ms");
        self.state = Kinematics {
            velocity,
            animation: Some(Animation {
                last_frame_ms: timestamp_ms,
            }),
            ..Kinematics::default()
        };
        Phase::Inertia
    }

    /// Advance the inertial animation by one frame.
    ///
    /// Returns `true` while more frames are wanted.
    pub fn frame<R: ScrollRegion + ?Sized>(&mut self, now_ms: f64, region: &mut R) -> bool {
        let Some(animation) = self.state.animation.as_mut() else {
            return false;
        };
        let elapsed = now_ms - animation.last_frame_ms;
        let dt = if elapsed > 0.0 {
            elapsed
        } else {
            self.config.frame_interval_estimate
        };
        animation.last_frame_ms = now_ms;

        let velocity = self.state.velocity;
        if !scroll_by(region, velocity * dt) {
            trace!("kinetic: hit edge, stopping");
            self.cancel();
            return false;
        }

        let speed = self.config.deceleration.mul_add(-dt, velocity.abs());
        if speed <= self.config.min_velocity {
            trace!("kinetic: decayed, stopping");
            self.cancel();
            return false;
        }
        self.state.velocity = speed.copysign(velocity);
        true
    }

    /// Drop the gesture and any animation.
    pub fn cancel(&mut self) {
        self.state = Kinematics::default();
    }
}

/// Scroll `region` by `delta` pixels, clamped to its extent.
///
/// Returns whether the position changed.
fn scroll_by<R: ScrollRegion + ?Sized>(region: &mut R, delta: f64) -> bool {
    let before = region.scroll_top();
    let target = (before + delta).clamp(0.0, region.max_scroll_top());
    region.set_scroll_top(target);
    (region.scroll_top() - before).abs() > 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Region {
        top: f64,
        height: f64,
        client: f64,
    }

    impl Region {
        fn new(top: f64) -> Self {
            Self {
                top,
                height: 10_000.0,
                client: 500.0,
            }
        }
    }

    impl ScrollRegion for Region {
        fn scroll_top(&self) -> f64 {
            self.top
        }
        fn set_scroll_top(&mut self, top: f64) {
            self.top = top;
        }
        fn scroll_height(&self) -> f64 {
            self.height
        }
        fn client_height(&self) -> f64 {
            self.client
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_press_starts_tracking() {
        let mut engine = KineticScroller::new();
        assert_eq!(engine.phase(), Phase::Idle);
        engine.press(Some(PointerId(1)), 300.0, 0.0);
        assert_eq!(engine.phase(), Phase::Tracking);
        assert_eq!(engine.active_pointer(), Some(PointerId(1)));
    }

    #[test]
    fn test_move_scrolls_with_multiplier() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(1000.0);
        engine.press(None, 300.0, 0.0);

        // Finger moves up 10px: content scrolls toward newer output.
        assert!(engine.track(290.0, 16.0, &mut region));
        let scroll = 10.0 * (2.2 + 10.0 / 25.0);
        assert!(approx(region.top, 1000.0 + scroll));
        assert!(approx(engine.velocity(), (scroll / 16.0) * 0.25));
    }

    #[test]
    fn test_boost_is_capped() {
        let config = KineticConfig::default();
        assert!(approx(config.multiplier(0.0), 2.2));
        assert!(approx(config.multiplier(-50.0), 4.2));
        assert!(approx(config.multiplier(500.0), 5.0));
    }

    #[test]
    fn test_jitter_floor() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(1000.0);
        engine.press(None, 300.0, 0.0);

        assert!(!engine.track(299.5, 16.0, &mut region));
        assert!(approx(region.top, 1000.0));
        assert!(approx(engine.velocity(), 0.0));
    }

    #[test]
    fn test_dt_floor() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(1000.0);
        engine.press(None, 300.0, 100.0);
        engine.track(298.0, 100.5, &mut region);

        let scroll = 2.0 * (2.2 + 2.0 / 25.0);
        assert!(approx(engine.velocity(), scroll / 8.0 * 0.25));
    }

    #[test]
    fn test_velocity_clamped() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(5000.0);
        engine.press(None, 1000.0, 0.0);
        let mut y = 1000.0;
        for i in 1..20 {
            y -= 200.0;
            engine.track(y, f64::from(i) * 8.0, &mut region);
        }
        assert!(engine.velocity() <= 8.0);
        assert!(engine.velocity() > 7.0);
    }

    #[test]
    fn test_move_clamps_to_region() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(10.0);
        engine.press(None, 100.0, 0.0);
        engine.track(300.0, 16.0, &mut region);
        assert!(approx(region.top, 0.0));

        let mut region = Region::new(9490.0);
        engine.press(None, 300.0, 0.0);
        engine.track(100.0, 16.0, &mut region);
        assert!(approx(region.top, 9500.0));
    }

    #[test]
    fn test_slow_release_goes_idle() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(1000.0);
        engine.press(None, 300.0, 0.0);
        engine.track(298.0, 1000.0, &mut region);
        assert_eq!(engine.release(1010.0), Phase::Idle);
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_inertia_decays_and_stops() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(2000.0);
        engine.press(None, 600.0, 0.0);
        for i in 1..=5 {
            engine.track(600.0 - f64::from(i) * 20.0, f64::from(i) * 16.0, &mut region);
        }
        let v0 = engine.velocity();
        assert_eq!(engine.release(80.0), Phase::Inertia);

        let bound = engine.config().max_inertia_frames(v0, 16.0);
        let mut frames = 0;
        let mut now = 80.0;
        let mut last_top = region.top;
        while engine.is_animating() {
            now += 16.0;
            engine.frame(now, &mut region);
            frames += 1;
            assert!(region.top >= last_top);
            last_top = region.top;
            assert!(frames <= bound);
        }
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(frames > 1);
    }

    #[test]
    fn test_inertia_stops_at_boundary() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(9400.0);
        engine.press(None, 600.0, 0.0);
        engine.track(500.0, 16.0, &mut region);
        assert!(approx(region.top, 9500.0));
        assert_eq!(engine.release(20.0), Phase::Inertia);

        assert!(!engine.frame(36.0, &mut region));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_frame_without_elapsed_time_uses_estimate() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(2000.0);
        engine.press(None, 600.0, 0.0);
        engine.track(560.0, 16.0, &mut region);
        engine.release(20.0);
        let v = engine.velocity();
        let before = region.top;

        engine.frame(20.0, &mut region);
        assert!(approx(region.top, before + v * 16.0));
    }

    #[test]
    fn test_press_cancels_inertia() {
        let mut engine = KineticScroller::new();
        let mut region = Region::new(2000.0);
        engine.press(None, 600.0, 0.0);
        engine.track(560.0, 16.0, &mut region);
        engine.release(20.0);
        assert!(engine.is_animating());

        engine.press(Some(PointerId(2)), 100.0, 30.0);
        assert_eq!(engine.phase(), Phase::Tracking);
        assert!(approx(engine.velocity(), 0.0));
    }

    #[test]
    fn test_cancel_resets() {
        let mut engine = KineticScroller::new();
        engine.press(Some(PointerId(1)), 10.0, 0.0);
        engine.cancel();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.active_pointer(), None);
        assert_eq!(engine.release(5.0), Phase::Idle);
    }
}
