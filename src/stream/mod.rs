//! Stream module: From a growing chunk store to ordered surface writes.
//!
//! ```text
//! ChunkLog ──▶ Reconciler ──▶ WriteQueue ──▶ Surface
//!   (ids)      (cursor, reset     (one in flight,
//!               detection)         one pending)
//! ```

mod chunk;
mod reconcile;
mod write_queue;

pub use chunk::{Chunk, ChunkLog, SessionId};
pub use reconcile::{DeliveryCursor, Reconciler, Reconciliation};
pub use write_queue::WriteQueue;
