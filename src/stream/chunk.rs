//! Chunks: Identified fragments of process output.
//!
//! A session's output is an ordered, growing sequence of chunks with
//! strictly increasing ids. The only way a sequence changes other than by
//! growing is wholesale replacement, which always shows up as a new first
//! id (or a shorter sequence).

/// One identified fragment of process output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Identifier, unique and increasing within a session.
    pub id: u64,
    /// Output payload.
    pub data: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(id: u64, data: impl Into<String>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }
}

/// Identity of an attached session.
///
/// Chunk ids are only unique within one session, so a session change is
/// always a reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An in-memory chunk store for one session.
///
/// With a capacity cap, the oldest chunks rotate out as new ones arrive,
/// which readers observe as a changed first id.
#[derive(Debug, Clone, Default)]
pub struct ChunkLog {
    chunks: Vec<Chunk>,
    next_id: u64,
    max_chunks: Option<usize>,
}

impl ChunkLog {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log retaining at most `max_chunks` chunks.
    pub fn with_max_chunks(max_chunks: usize) -> Self {
        Self {
            max_chunks: Some(max_chunks.max(1)),
            ..Self::default()
        }
    }

    /// Append a payload, returning its id.
    pub fn push(&mut self, data: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.chunks.push(Chunk::new(id, data));
        if let Some(max) = self.max_chunks {
            if self.chunks.len() > max {
                let excess = self.chunks.len() - max;
                self.chunks.drain(..excess);
            }
        }
        id
    }

    /// Replace the whole log with new payloads.
    ///
    /// Ids keep increasing across the replacement so the new first id
    /// always differs from the old one.
    pub fn replace<I, S>(&mut self, payloads: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks.clear();
        for data in payloads {
            self.push(data);
        }
    }

    /// Drop every chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// The retained chunks, oldest first.
    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of retained chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
