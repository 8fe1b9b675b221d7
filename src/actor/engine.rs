//! Engine: Hosts a viewport in the current terminal.
//!
//! The engine owns the terminal (raw mode, alternate screen, mouse
//! capture), the chunk log for the attached session, and a
//! [`Viewport`] over a [`VtSurface`]. Its loop multiplexes input,
//! transport events and animation frames, then paints whatever changed.

use super::input::{EventTranslator, InputActor};
use super::messages::{HostMessage, InputEvent, KeyCode, KeyInput, KeyModifiers, TransportEvent};
use super::ticker::{Frame, FrameClock};
use crate::config::{ConfigChange, ViewportConfig};
use crate::error::HostError;
use crate::layout::{CellMetrics, GridSize, PixelSize};
use crate::scroll::gesture_source;
use crate::stream::ChunkLog;
use crate::surface::VtSurface;
use crate::terminal::{ScreenPainter, TerminalGuard, TerminalSetup};
use crate::viewport::{Viewport, ViewportControl};
use crossbeam_channel::{bounded, never, select, unbounded, Receiver, Sender};
use crossterm::terminal;
use log::{debug, warn};
use std::io;
use std::time::{Duration, Instant};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time between animation frames.
    pub frame_interval: Duration,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Key that stops the engine instead of reaching the remote process.
    pub exit_key: KeyInput,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
            exit_key: KeyInput {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
            },
        }
    }
}

/// The terminal host.
pub struct Engine {
    config: EngineConfig,
    viewport: Viewport<VtSurface>,
    chunks: ChunkLog,
    input_tx: Sender<InputEvent>,
    input_rx: Receiver<InputEvent>,
    input_actor: Option<InputActor>,
    clock: FrameClock,
    host_rx: Receiver<HostMessage>,
    painter: ScreenPainter,
    /// Restores the terminal once the actors have stopped.
    terminal: TerminalGuard<io::Stdout>,
    /// Host terminal size in cells.
    host_grid: GridSize,
    metrics: CellMetrics,
    epoch: Instant,
    transport_open: bool,
    running: bool,
}

impl Engine {
    /// Take over the terminal and mount a viewport configured by `viewport_config`.
    pub fn new(config: EngineConfig, viewport_config: ViewportConfig) -> Result<Self, HostError> {
        let (cols, rows) = terminal::size()?;
        let host_grid = GridSize::new(cols, rows);
        let surface = VtSurface::from_config(host_grid, &viewport_config)?;
        let metrics = surface.metrics();

        let (host_tx, host_rx) = unbounded();
        let resize_tx = host_tx.clone();
        let gestures = gesture_source(true, viewport_config.mouse_as_touch);
        let chunks = viewport_config
            .max_chunks
            .map_or_else(ChunkLog::new, ChunkLog::with_max_chunks);
        let mut viewport = Viewport::new(surface, viewport_config, gestures)
            .on_input(move |data| {
                let _ = host_tx.send(HostMessage::Input(data.to_string()));
            })
            .on_resize(move |grid| {
                let _ = resize_tx.send(HostMessage::Resize(grid));
            });

        // Any early return below drops the guard and restores the terminal.
        let terminal = TerminalGuard::stdout(TerminalSetup {
            raw_mode: true,
            alternate_screen: config.alternate_screen,
            mouse_capture: config.enable_mouse,
        })?;

        let epoch = Instant::now();
        let (input_tx, input_rx) = bounded(64);
        let input_actor = InputActor::spawn(
            input_tx.clone(),
            EventTranslator::new(metrics, epoch),
            config.input_poll_timeout,
        )?;
        let clock = FrameClock::spawn(config.frame_interval, epoch)?;

        viewport.observe_container(PixelSize::of_grid(host_grid, metrics));
        viewport.focus();

        Ok(Self {
            config,
            viewport,
            chunks,
            input_tx,
            input_rx,
            input_actor: Some(input_actor),
            clock,
            host_rx,
            painter: ScreenPainter::new(),
            terminal,
            host_grid,
            metrics,
            epoch,
            transport_open: true,
            running: true,
        })
    }

    /// The mounted viewport.
    pub const fn viewport(&self) -> &Viewport<VtSurface> {
        &self.viewport
    }

    /// The mounted viewport, mutably.
    pub fn viewport_mut(&mut self) -> &mut Viewport<VtSurface> {
        &mut self.viewport
    }

    /// Chunks of the attached session.
    pub const fn chunks(&self) -> &ChunkLog {
        &self.chunks
    }

    /// Messages for the transport: typed input and grid changes.
    pub const fn host_messages(&self) -> &Receiver<HostMessage> {
        &self.host_rx
    }

    /// Check if the engine is still running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the engine.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Reconfigure the viewport in place.
    pub fn apply_config(&mut self, config: ViewportConfig) -> Result<ConfigChange, HostError> {
        let change = self.viewport.apply_config(config)?;
        if change.contains(ConfigChange::FONT) {
            self.metrics = self.viewport.surface().metrics();
            // Pointer coordinates are scaled by the cell metrics.
            if let Some(actor) = self.input_actor.take() {
                actor.join();
            }
            self.input_actor = Some(InputActor::spawn(
                self.input_tx.clone(),
                EventTranslator::new(self.metrics, self.epoch),
                self.config.input_poll_timeout,
            )?);
            self.viewport
                .observe_container(PixelSize::of_grid(self.host_grid, self.metrics));
        }
        Ok(change)
    }

    /// Load a config file and apply it.
    pub fn reload_config(&mut self, path: &std::path::Path) -> Result<ConfigChange, HostError> {
        let config = ViewportConfig::load(path)?;
        self.apply_config(config)
    }

    /// Run until the exit key is pressed or [`Engine::stop`] is called.
    pub fn run(&mut self, transport: &Receiver<TransportEvent>) -> Result<(), HostError> {
        let input = self.input_rx.clone();
        let frames = self.clock.receiver().clone();
        debug!("engine: running, raw mode {}", self.terminal.is_raw());
        self.paint()?;

        while self.running {
            let transport = if self.transport_open {
                transport.clone()
            } else {
                never()
            };
            select! {
                recv(input) -> event => match event {
                    Ok(event) => self.handle_input(event),
                    Err(_) => self.running = false,
                },
                recv(transport) -> event => match event {
                    Ok(event) => self.handle_transport(event),
                    Err(_) => self.handle_transport(TransportEvent::Closed),
                },
                recv(frames) -> frame => {
                    if let Ok(frame) = frame {
                        self.handle_frame(frame);
                    }
                },
            }
            self.viewport.run_pending();
            self.paint()?;
        }
        Ok(())
    }

    /// Route one input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) if key == self.config.exit_key => self.running = false,
            InputEvent::Resize { cols, rows } => {
                self.host_grid = GridSize::new(cols, rows);
                self.viewport
                    .observe_container(PixelSize::of_grid(self.host_grid, self.metrics));
            }
            InputEvent::FocusLost => self.viewport.surface_mut().blur(),
            InputEvent::Error(message) => warn!("input: {message}"),
            // Sent by actors replaced on a font change too, so not a stop signal.
            InputEvent::Shutdown => debug!("engine: input actor stopped"),
            event => {
                self.viewport.handle_input(&event);
            }
        }
        if self.viewport.wants_frame() {
            self.clock.activate();
        }
    }

    /// Apply one transport event to the chunk log and sync the viewport.
    pub fn handle_transport(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Output(data) => {
                self.chunks.push(data);
            }
            TransportEvent::Replace(payloads) => self.chunks.replace(payloads),
            TransportEvent::Session(session) => {
                self.chunks.clear();
                self.viewport.set_session(session);
            }
            TransportEvent::Closed => {
                if self.transport_open {
                    debug!("engine: transport closed");
                }
                self.transport_open = false;
                return;
            }
        }
        self.viewport.sync(self.chunks.as_slice());
    }

    fn handle_frame(&mut self, frame: Frame) {
        if !self.viewport.frame(frame.timestamp_ms) {
            self.clock.deactivate();
        }
    }

    fn paint(&mut self) -> io::Result<()> {
        if !self.viewport.surface().needs_redraw() {
            return Ok(());
        }
        self.painter
            .paint(self.viewport.surface(), &mut io::stdout().lock())?;
        self.viewport.surface_mut().clear_redraw();
        Ok(())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.viewport.dispose();

        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }
        self.clock.shutdown();
    }
}
