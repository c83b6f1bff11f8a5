//! A software device that records what would have gone on the wire.
use crate::layer::Result;
use crate::storage::Chunk;

use super::Device;

/// A device that stores every transmitted frame.
///
/// Frames are kept in transmission order as plain byte vectors, so tests and
/// examples can assert on exactly what a real driver would have seen.
#[derive(Debug, Default)]
pub struct Sink {
    sent: Vec<Vec<u8>>,
}

impl Sink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Sink::default()
    }

    /// The frames transmitted so far, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Forget all recorded frames.
    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Device for Sink {
    type Payload = Chunk;

    fn alloc(&mut self, len: usize) -> Option<Chunk> {
        Some(Chunk::new(len))
    }

    fn transmit(&mut self, frame: Chunk) -> Result<()> {
        use crate::wire::Payload;
        self.sent.push(frame.payload().as_slice().to_vec());
        Ok(())
    }
}
