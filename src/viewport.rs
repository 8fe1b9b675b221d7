//! Viewport: Wires the controllers to one rendering surface.
//!
//! A viewport owns the surface and everything that feeds it: the write
//! queue, the reconciliation cursor, the resize coordinator and the
//! kinetic scroll engine. None of them outlive it, and a session change
//! resets all of them at once.
//!
//! Everything runs on the caller's thread. Surface completions arrive as
//! tasks, so hosts call [`Viewport::run_pending`] after delivering events.

use crate::actor::InputEvent;
use crate::config::{ConfigChange, ViewportConfig};
use crate::error::ConfigError;
use crate::layout::{GridSize, PixelSize, ResizeCoordinator};
use crate::sched::Scheduler;
use crate::scroll::{GestureSample, GestureSource, KineticScroller};
use crate::stream::{Chunk, Reconciler, Reconciliation, SessionId, WriteQueue};
use crate::surface::Surface;
use log::debug;

/// Called with input data for the remote process.
pub type InputCallback = Box<dyn FnMut(&str)>;

/// Called with the grid after every successful fit.
pub type ResizeCallback = Box<dyn FnMut(GridSize)>;

/// Imperative control over a mounted viewport.
pub trait ViewportControl {
    /// Give the surface keyboard focus.
    fn focus(&mut self);

    /// Reset the surface and refit it.
    fn clear(&mut self);

    /// Refit the grid to the container. Returns the grid if the fit ran.
    fn fit(&mut self) -> Option<GridSize>;
}

/// A live viewport over a stream of process output.
pub struct Viewport<S: Surface> {
    surface: S,
    config: ViewportConfig,
    scheduler: Scheduler,
    queue: WriteQueue,
    reconciler: Reconciler,
    resize: ResizeCoordinator,
    scroller: KineticScroller,
    gestures: Box<dyn GestureSource>,
    session: Option<SessionId>,
    on_input: Option<InputCallback>,
    on_resize: Option<ResizeCallback>,
    disposed: bool,
}

impl<S: Surface> Viewport<S> {
    /// Mount a viewport on `surface`.
    pub fn new(mut surface: S, config: ViewportConfig, gestures: Box<dyn GestureSource>) -> Self {
        surface.set_kinetic_scroll(config.kinetic_scroll);
        debug!("viewport: mounted with {} gestures", gestures.name());
        Self {
            surface,
            config,
            scheduler: Scheduler::new(),
            queue: WriteQueue::new(),
            reconciler: Reconciler::new(),
            resize: ResizeCoordinator::new(),
            scroller: KineticScroller::new(),
            gestures,
            session: None,
            on_input: None,
            on_resize: None,
            disposed: false,
        }
    }

    /// Set the input callback.
    #[must_use]
    pub fn on_input(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_input = Some(Box::new(callback));
        self
    }

    /// Set the resize callback.
    #[must_use]
    pub fn on_resize(mut self, callback: impl FnMut(GridSize) + 'static) -> Self {
        self.on_resize = Some(Box::new(callback));
        self
    }

    /// The rendering surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The rendering surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Active configuration.
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The attached session, if any.
    pub const fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// The kinetic scroll engine.
    pub const fn scroller(&self) -> &KineticScroller {
        &self.scroller
    }

    /// The write queue.
    pub const fn write_queue(&self) -> &WriteQueue {
        &self.queue
    }

    /// Whether [`Viewport::dispose`] has run.
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Attach a session. Returns `true` if it differs from the current one.
    ///
    /// Chunk ids are only comparable within a session, so any change resets
    /// the surface, the queue and the cursor unconditionally, and cancels
    /// scrolling.
    pub fn set_session(&mut self, session: SessionId) -> bool {
        if self.disposed || self.session.as_ref() == Some(&session) {
            return false;
        }
        debug!("viewport: session {:?} -> {session}", self.session.as_ref().map(SessionId::as_str));
        self.cancel_gesture();
        self.surface.reset();
        self.queue.reset();
        self.reconciler.clear();
        self.session = Some(session);
        self.fit();
        true
    }

    /// Bring the surface up to date with the session's chunks.
    pub fn sync(&mut self, chunks: &[Chunk]) -> Reconciliation {
        if self.disposed {
            return Reconciliation::Unchanged;
        }
        let tasks = self.scheduler.sender();
        let outcome = self
            .reconciler
            .reconcile(chunks, &mut self.queue, &mut self.surface, &tasks);
        if outcome == Reconciliation::Cleared {
            self.fit();
        }
        outcome
    }

    /// Run deferred work. Returns the number of tasks handled.
    pub fn run_pending(&mut self) -> usize {
        let tasks = self.scheduler.sender();
        let mut handled = 0;
        while let Some(task) = self.scheduler.pop() {
            if !self.disposed {
                self.queue.handle(task, &mut self.surface, &tasks);
            }
            handled += 1;
        }
        handled
    }

    /// Whether deferred work is waiting for [`Viewport::run_pending`].
    pub fn has_pending_tasks(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Report a new container size and refit.
    pub fn observe_container(&mut self, size: PixelSize) -> Option<GridSize> {
        self.resize.observe(size);
        self.fit()
    }

    /// Route an input event. Returns `true` if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.disposed {
            return false;
        }
        match event {
            InputEvent::Key(key) => {
                if let Some(data) = self.surface.key_input(key) {
                    self.emit_input(&data);
                }
                true
            }
            InputEvent::Paste(text) => {
                if let Some(data) = self.surface.paste_input(text) {
                    self.emit_input(&data);
                }
                true
            }
            InputEvent::Wheel { delta_y } => {
                self.cancel_gesture();
                let top = self.surface.scroll_top() + delta_y;
                self.surface.set_scroll_top(top);
                true
            }
            InputEvent::Pointer(_) | InputEvent::Touch(_) => self.handle_gesture(event),
            InputEvent::FocusGained => {
                self.surface.focus();
                true
            }
            _ => false,
        }
    }

    fn handle_gesture(&mut self, event: &InputEvent) -> bool {
        if !self.config.kinetic_scroll {
            return false;
        }
        let Some(sample) = self.gestures.sample(event) else {
            return false;
        };
        match sample {
            GestureSample::Press {
                pointer,
                y,
                timestamp_ms,
            } => {
                if let Some(previous) = self.scroller.active_pointer() {
                    self.surface.release_pointer(previous);
                }
                self.scroller.press(pointer, y, timestamp_ms);
                if let Some(pointer) = pointer {
                    self.surface.capture_pointer(pointer);
                }
            }
            GestureSample::Move { y, timestamp_ms } => {
                self.scroller.track(y, timestamp_ms, &mut self.surface);
            }
            GestureSample::Release {
                pointer,
                timestamp_ms,
            } => {
                if let Some(pointer) = pointer {
                    self.surface.release_pointer(pointer);
                }
                self.scroller.release(timestamp_ms);
            }
            GestureSample::Abort => self.cancel_gesture(),
        }
        true
    }

    /// Whether an inertial animation wants frames.
    pub const fn wants_frame(&self) -> bool {
        !self.disposed && self.scroller.is_animating()
    }

    /// Advance animations. Returns `true` while more frames are wanted.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.scroller.frame(now_ms, &mut self.surface)
    }

    /// Reconfigure in place.
    ///
    /// Font and theme changes refit immediately; turning kinetic scrolling
    /// off stops any gesture in progress.
    pub fn apply_config(&mut self, config: ViewportConfig) -> Result<ConfigChange, ConfigError> {
        let theme = config.resolve_theme()?;
        let change = self.config.diff(&config);
        if change.is_empty() {
            return Ok(change);
        }
        debug!("viewport: config change {change:?}");
        if change.contains(ConfigChange::FONT) {
            self.surface.set_font(&config.font());
        }
        if change.contains(ConfigChange::THEME) {
            self.surface.set_theme(&theme);
        }
        if change.contains(ConfigChange::KINETIC) {
            self.surface.set_kinetic_scroll(config.kinetic_scroll);
            if !config.kinetic_scroll {
                self.cancel_gesture();
            }
        }
        if change.contains(ConfigChange::SCROLLBACK) {
            debug!("viewport: scrollback change applies to the next surface");
        }
        self.config = config;
        if change.needs_refit() {
            self.fit();
        }
        Ok(change)
    }

    /// Tear down: release pointer capture, cancel animation, detach
    /// callbacks, then dispose the surface.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_gesture();
        self.on_input = None;
        self.on_resize = None;
        self.queue.reset();
        self.reconciler.clear();
        self.resize.clear();
        self.surface.dispose();
        self.disposed = true;
        debug!("viewport: disposed");
    }

    fn cancel_gesture(&mut self) {
        if let Some(pointer) = self.scroller.active_pointer() {
            self.surface.release_pointer(pointer);
        }
        self.scroller.cancel();
        self.gestures.reset();
    }

    fn emit_input(&mut self, data: &str) {
        if let Some(callback) = self.on_input.as_mut() {
            callback(data);
        }
    }
}

impl<S: Surface> ViewportControl for Viewport<S> {
    fn focus(&mut self) {
        if !self.disposed {
            self.surface.focus();
        }
    }

    fn clear(&mut self) {
        if self.disposed {
            return;
        }
        self.surface.reset();
        self.fit();
    }

    fn fit(&mut self) -> Option<GridSize> {
        if self.disposed {
            return None;
        }
        let grid = self.resize.fit(&mut self.surface).ok()?;
        if let Some(callback) = self.on_resize.as_mut() {
            callback(grid);
        }
        Some(grid)
    }
}

impl<S: Surface> Drop for Viewport<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
