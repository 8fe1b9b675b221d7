//! Scheduler: Deferred tasks for the viewport's single event context.
//!
//! Completion callbacks never call back into the viewport directly; they
//! post a [`Task`] instead, and the owner drains the queue on its own
//! turn. This keeps the call stack flat no matter how fast writes
//! complete, and lets callbacks cross threads safely.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Work deferred to a later turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// The surface finished a write issued under `generation`.
    WriteComplete {
        /// Write queue generation at issue time.
        generation: u64,
    },
    /// Issue the pending write, if it still belongs to `generation`.
    FlushWrites {
        /// Write queue generation at scheduling time.
        generation: u64,
    },
}

/// Cloneable handle for posting tasks.
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: Sender<Task>,
}

impl TaskSender {
    /// Post a task for a later turn.
    ///
    /// Posting after the scheduler is gone is a no-op.
    pub fn post(&self, task: Task) {
        let _ = self.tx.send(task);
    }
}

/// FIFO task queue owned by one viewport.
#[derive(Debug)]
pub struct Scheduler {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A handle for posting tasks.
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            tx: self.tx.clone(),
        }
    }

    /// Take the next task, if any.
    pub fn pop(&self) -> Option<Task> {
        self.rx.try_recv().ok()
    }

    /// Check whether tasks are waiting.
    pub fn has_pending(&self) -> bool {
        !self.rx.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
