//! Frame Clock: Display-paced frames, only while something animates.
//!
//! The clock thread idles until [`FrameClock::activate`] is called and
//! goes quiet again after [`FrameClock::deactivate`], so an idle viewport
//! costs no wakeups.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// An animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Milliseconds since the clock's epoch.
    pub timestamp_ms: f64,
}

/// Frame clock actor.
pub struct FrameClock {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    frame_rx: Receiver<Frame>,
}

impl FrameClock {
    /// Spawn a clock ticking every `interval` while active.
    ///
    /// Timestamps are measured from `epoch`, which should be shared with
    /// the input actor so frame and gesture times are comparable.
    pub fn spawn(interval: Duration, epoch: Instant) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let active = Arc::new(AtomicBool::new(false));
        // Frames must not queue up behind a slow consumer.
        let (frame_tx, frame_rx) = bounded(1);

        let handle = {
            let shutdown = shutdown.clone();
            let active = active.clone();
            thread::Builder::new()
                .name("streamview-frames".to_string())
                .spawn(move || Self::run_loop(&frame_tx, &shutdown, &active, interval, epoch))?
        };

        Ok(Self {
            handle: Some(handle),
            shutdown,
            active,
            frame_rx,
        })
    }

    /// Receiver for frames, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Frame> {
        &self.frame_rx
    }

    /// Start emitting frames.
    pub fn activate(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Stop emitting frames.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Whether frames are being emitted.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Signal the clock to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the clock thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(
        frame_tx: &Sender<Frame>,
        shutdown: &AtomicBool,
        active: &AtomicBool,
        interval: Duration,
        epoch: Instant,
    ) {
        let mut frame = 0u64;
        let mut next_frame = Instant::now() + interval;

        while !shutdown.load(Ordering::Relaxed) {
            if !active.load(Ordering::Relaxed) {
                thread::sleep(interval);
                next_frame = Instant::now() + interval;
                continue;
            }

            let now = Instant::now();
            if now < next_frame {
                thread::sleep((next_frame - now).min(Duration::from_millis(1)));
                continue;
            }

            let tick = Frame {
                frame,
                timestamp_ms: (now - epoch).as_secs_f64() * 1000.0,
            };
            // Full buffer: the consumer has not taken the last frame yet.
            let _ = frame_tx.try_send(tick);
            frame += 1;
            next_frame += interval;
            if next_frame < now {
                next_frame = now + interval;
            }
        }
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.shutdown();
    }
}
