//! Reconciliation: Decide what part of the chunk store still needs writing.
//!
//! The controller compares the store against a [`DeliveryCursor`] and
//! either appends the delta or, when the store was replaced or rotated
//! instead of appended to, resets the surface and replays it.

use super::chunk::Chunk;
use super::write_queue::WriteQueue;
use crate::sched::TaskSender;
use crate::surface::Surface;
use log::{debug, trace};

/// How much of the chunk sequence has been handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryCursor {
    /// Chunks handed to the write queue.
    pub processed_count: usize,
    /// Id of the first chunk when the sequence was first observed.
    pub first_observed_id: Option<u64>,
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing new.
    Unchanged,
    /// New chunks were enqueued on top of what was delivered.
    Appended {
        /// Number of new chunks.
        chunks: usize,
    },
    /// The store was replaced or rotated; the surface was reset and the
    /// whole store enqueued.
    Replayed {
        /// Number of chunks replayed.
        chunks: usize,
    },
    /// The store went empty; the surface was reset. Callers should refit.
    Cleared,
}

/// The reconciliation controller.
#[derive(Debug, Default)]
pub struct Reconciler {
    cursor: DeliveryCursor,
    /// Index of the first chunk in the payload still waiting in the queue.
    unissued_from: Option<usize>,
}

impl Reconciler {
    /// Create a controller that has delivered nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor.
    pub const fn cursor(&self) -> DeliveryCursor {
        self.cursor
    }

    /// Forget all delivery state.
    ///
    /// Used on session change, where chunk ids stop being comparable.
    pub fn clear(&mut self) {
        self.cursor = DeliveryCursor::default();
        self.unissued_from = None;
    }

    /// Bring the surface up to date with `chunks`.
    pub fn reconcile<S: Surface + ?Sized>(
        &mut self,
        chunks: &[Chunk],
        queue: &mut WriteQueue,
        surface: &mut S,
        tasks: &TaskSender,
    ) -> Reconciliation {
        let Some(first) = chunks.first() else {
            if self.cursor.processed_count == 0 {
                return Reconciliation::Unchanged;
            }
            debug!("reconcile: store emptied, resetting surface");
            surface.reset();
            queue.reset();
            self.clear();
            return Reconciliation::Cleared;
        };

        let first_observed = *self.cursor.first_observed_id.get_or_insert(first.id);
        let replayed = first_observed != first.id || self.cursor.processed_count > chunks.len();
        if replayed {
            debug!(
                "reconcile: store replaced (first id {first_observed} -> {}, cursor {} of {}), replaying",
                first.id,
                self.cursor.processed_count,
                chunks.len()
            );
            surface.reset();
            queue.reset();
            self.cursor = DeliveryCursor {
                processed_count: 0,
                first_observed_id: Some(first.id),
            };
            self.unissued_from = None;
        }

        let processed = self.cursor.processed_count;
        if processed == chunks.len() {
            return Reconciliation::Unchanged;
        }

        // A payload still sitting in the queue will be replaced, so the new
        // payload has to cover it too.
        let start = match self.unissued_from {
            Some(from) if queue.has_pending() => from,
            _ => processed,
        };
        let delta: String = chunks[start..].iter().map(|c| c.data.as_str()).collect();
        trace!(
            "reconcile: enqueue chunks {start}..{} ({} bytes)",
            chunks.len(),
            delta.len()
        );

        self.cursor.processed_count = chunks.len();
        queue.enqueue(delta, surface, tasks);
        self.unissued_from = queue.has_pending().then_some(start);

        let fresh = chunks.len() - processed;
        if replayed {
            Reconciliation::Replayed { chunks: fresh }
        } else {
            Reconciliation::Appended { chunks: fresh }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::Scheduler;
    use crate::surface::testing::{Call, RecordingSurface};

    struct Harness {
        scheduler: Scheduler,
        surface: RecordingSurface,
        queue: WriteQueue,
        reconciler: Reconciler,
    }

    impl Harness {
        fn new(auto_complete: bool) -> Self {
            let mut surface = RecordingSurface::new();
            surface.auto_complete = auto_complete;
            Self {
                scheduler: Scheduler::new(),
                surface,
                queue: WriteQueue::new(),
                reconciler: Reconciler::new(),
            }
        }

        fn reconcile(&mut self, chunks: &[Chunk]) -> Reconciliation {
            let tasks = self.scheduler.sender();
            let outcome =
                self.reconciler
                    .reconcile(chunks, &mut self.queue, &mut self.surface, &tasks);
            self.drain();
            outcome
        }

        fn drain(&mut self) {
            let tasks = self.scheduler.sender();
            while let Some(task) = self.scheduler.pop() {
                self.queue.handle(task, &mut self.surface, &tasks);
            }
        }
    }

    fn chunks(entries: &[(u64, &str)]) -> Vec<Chunk> {
        entries.iter().map(|&(id, data)| Chunk::new(id, data)).collect()
    }

    #[test]
    fn test_delta_correctness() {
        let mut h = Harness::new(true);
        h.reconcile(&chunks(&[(1, "a"), (2, "b")]));
        let outcome = h.reconcile(&chunks(&[(1, "a"), (2, "b"), (3, "c")]));

        assert_eq!(outcome, Reconciliation::Appended { chunks: 1 });
        assert_eq!(h.surface.writes(), vec!["ab", "c"]);
    }

    #[test]
    fn test_idempotent() {
        let mut h = Harness::new(true);
        let store = chunks(&[(1, "a"), (2, "b")]);
        h.reconcile(&store);
        assert_eq!(h.reconcile(&store), Reconciliation::Unchanged);
        assert_eq!(h.surface.writes().len(), 1);
    }

    #[test]
    fn test_reset_on_first_id_change() {
        let mut h = Harness::new(true);
        h.reconcile(&chunks(&[(5, "old-1"), (6, "old-2")]));
        let outcome = h.reconcile(&chunks(&[(9, "new")]));

        assert_eq!(outcome, Reconciliation::Replayed { chunks: 1 });
        let last_reset = h.surface.calls.iter().rposition(|c| *c == Call::Reset).unwrap();
        let new_write = h
            .surface
            .calls
            .iter()
            .position(|c| *c == Call::Write("new".to_string()))
            .unwrap();
        assert!(last_reset < new_write);
        assert_eq!(h.surface.writes(), vec!["old-1old-2", "new"]);
        assert_eq!(h.reconciler.cursor().first_observed_id, Some(9));
    }

    #[test]
    fn test_reset_on_shrink() {
        let mut h = Harness::new(true);
        h.reconcile(&chunks(&[(1, "a"), (2, "b"), (3, "c")]));
        let outcome = h.reconcile(&chunks(&[(1, "x")]));

        assert_eq!(outcome, Reconciliation::Replayed { chunks: 1 });
        assert_eq!(h.surface.count(&Call::Reset), 1);
        assert_eq!(h.surface.writes(), vec!["abc", "x"]);
    }

    #[test]
    fn test_reset_to_empty() {
        let mut h = Harness::new(true);
        assert_eq!(h.reconcile(&[]), Reconciliation::Unchanged);
        assert_eq!(h.surface.count(&Call::Reset), 0);

        h.reconcile(&chunks(&[(1, "a")]));
        assert_eq!(h.reconcile(&[]), Reconciliation::Cleared);
        assert_eq!(h.surface.count(&Call::Reset), 1);
        assert_eq!(h.reconciler.cursor(), DeliveryCursor::default());

        // Ids may restart after a clear.
        h.reconcile(&chunks(&[(1, "again")]));
        assert_eq!(h.surface.writes(), vec!["a", "again"]);
    }

    #[test]
    fn test_burst_while_busy_loses_nothing() {
        let mut h = Harness::new(false);
        let mut store = chunks(&[(1, "a")]);
        h.reconcile(&store);
        for (id, data) in [(2, "b"), (3, "c"), (4, "d")] {
            store.push(Chunk::new(id, data));
            h.reconcile(&store);
        }
        assert_eq!(h.surface.writes(), vec!["a"]);

        h.surface.complete_next();
        h.drain();
        assert_eq!(h.surface.writes(), vec!["a", "bcd"]);

        store.push(Chunk::new(5, "e"));
        h.reconcile(&store);
        h.surface.complete_next();
        h.drain();
        assert_eq!(h.surface.writes(), vec!["a", "bcd", "e"]);
        assert_eq!(h.surface.writes().concat(), "abcde");
    }

    #[test]
    fn test_replay_excludes_old_content_while_busy() {
        let mut h = Harness::new(false);
        h.reconcile(&chunks(&[(5, "old")]));
        h.reconcile(&chunks(&[(5, "old"), (6, "older")]));
        h.reconcile(&chunks(&[(9, "fresh")]));

        assert_eq!(h.surface.writes(), vec!["old", "fresh"]);
    }
}
