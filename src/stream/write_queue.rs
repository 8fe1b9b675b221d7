//! Write Queue: Ordered, non-blocking delivery of output to a surface.
//!
//! The surface accepts one write at a time and reports completion through
//! a callback. The queue holds at most one pending payload; a new payload
//! replaces the pending one instead of queueing behind it, because callers
//! always enqueue everything that is still outstanding.
//!
//! # Lifecycle
//!
//! ```text
//! enqueue ──▶ idle? ── yes ──▶ write ──▶ (in flight) ── done ──▶ WriteComplete task
//!               │                                                     │
//!               no: replace pending                 pending? ──▶ FlushWrites task
//! ```

use crate::sched::{Task, TaskSender};
use crate::surface::Surface;
use log::trace;

/// Single-slot write queue.
#[derive(Debug, Default)]
pub struct WriteQueue {
    /// Payload waiting for the in-flight write to finish.
    pending: Option<String>,
    /// A write has been issued and its completion has not arrived.
    in_flight: bool,
    /// Bumped on reset so stale completions are ignored.
    generation: u64,
    /// Writes issued since creation.
    issued: u64,
}

impl WriteQueue {
    /// Create an idle queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for delivery.
    ///
    /// Writes immediately when idle; otherwise the payload replaces any
    /// pending one and goes out after the in-flight write completes.
    pub fn enqueue<S: Surface + ?Sized>(&mut self, payload: String, surface: &mut S, tasks: &TaskSender) {
        if payload.is_empty() {
            return;
        }
        if let Some(replaced) = self.pending.replace(payload) {
            trace!("write queue: replacing pending payload of {} bytes", replaced.len());
        }
        if !self.in_flight {
            self.flush(surface, tasks);
        }
    }

    /// Handle a [`Task`] addressed to the queue.
    pub fn handle<S: Surface + ?Sized>(&mut self, task: Task, surface: &mut S, tasks: &TaskSender) {
        match task {
            Task::WriteComplete { generation } => self.complete(generation, tasks),
            Task::FlushWrites { generation } => {
                if generation == self.generation {
                    self.flush(surface, tasks);
                }
            }
        }
    }

    /// Record completion of the write issued under `generation`.
    ///
    /// The next write is never issued from here; it is posted as a
    /// separate task so completion callbacks cannot nest.
    fn complete(&mut self, generation: u64, tasks: &TaskSender) {
        if generation != self.generation {
            trace!("write queue: ignoring completion from generation {generation}");
            return;
        }
        self.in_flight = false;
        if self.pending.is_some() {
            tasks.post(Task::FlushWrites { generation });
        }
    }

    /// Issue the pending payload if the surface is free.
    fn flush<S: Surface + ?Sized>(&mut self, surface: &mut S, tasks: &TaskSender) {
        if self.in_flight {
            return;
        }
        let Some(payload) = self.pending.take() else {
            return;
        };
        self.in_flight = true;
        self.issued += 1;
        let generation = self.generation;
        let tasks = tasks.clone();
        trace!("write queue: writing {} bytes", payload.len());
        surface.write(
            &payload,
            Box::new(move || tasks.post(Task::WriteComplete { generation })),
        );
    }

    /// Drop the pending payload and forget any in-flight write.
    pub fn reset(&mut self) {
        self.pending = None;
        self.in_flight = false;
        self.generation += 1;
    }

    /// Whether a payload is waiting to be issued.
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a write is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Number of writes issued so far.
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}
