//! A heap backed link buffer.
use crate::wire::{payload, Payload, PayloadError, PayloadMut};

use super::Buffer;

/// A heap allocated link buffer with explicit headroom.
///
/// The payload occupies the tail of the allocation; the space in front of it
/// is headroom that [`grow_head`] converts into payload when a header is
/// prepended. This mirrors how fixed descriptor rings hand out frames: the
/// allocation never moves or grows after creation.
///
/// [`grow_head`]: ../trait.Buffer.html#tymethod.grow_head
#[derive(Debug, Clone)]
pub struct Chunk {
    data: Vec<u8>,
    head: usize,
}

impl Chunk {
    /// Allocate a zeroed buffer of `len` payload octets without headroom.
    pub fn new(len: usize) -> Self {
        Chunk { data: vec![0; len], head: 0 }
    }

    /// Allocate a zeroed buffer of `len` payload octets behind `headroom` spare octets.
    pub fn with_headroom(headroom: usize, len: usize) -> Self {
        Chunk { data: vec![0; headroom + len], head: headroom }
    }

    /// Allocate a buffer holding a copy of `data` behind `headroom` spare octets.
    pub fn from_slice(headroom: usize, data: &[u8]) -> Self {
        let mut chunk = Chunk::with_headroom(headroom, data.len());
        chunk.payload_mut().as_mut_slice().copy_from_slice(data);
        chunk
    }

    /// The number of spare octets in front of the payload.
    pub fn headroom(&self) -> usize {
        self.head
    }
}

impl Payload for Chunk {
    fn payload(&self) -> &payload {
        (&self.data[self.head..]).into()
    }
}

impl PayloadMut for Chunk {
    fn payload_mut(&mut self) -> &mut payload {
        (&mut self.data[self.head..]).into()
    }
}

impl Buffer for Chunk {
    fn grow_head(&mut self, reserve: usize) -> Result<(), PayloadError> {
        if reserve <= self.head {
            self.head -= reserve;
            Ok(())
        } else {
            Err(PayloadError::BadSize)
        }
    }

    fn take(self) -> Option<Self> {
        // the payload is owned already
        Some(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn headroom_arithmetic() {
        let mut chunk = Chunk::with_headroom(14, 20);
        assert_eq!(chunk.headroom(), 14);
        assert_eq!(chunk.payload().as_slice().len(), 20);

        chunk.grow_head(14).unwrap();
        assert_eq!(chunk.headroom(), 0);
        assert_eq!(chunk.payload().as_slice().len(), 34);
    }

    #[test]
    fn growth_failure_is_lossless() {
        let mut chunk = Chunk::from_slice(4, &[1, 2, 3]);
        assert_eq!(chunk.grow_head(14), Err(PayloadError::BadSize));
        assert_eq!(chunk.payload().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn take_preserves_payload() {
        let chunk = Chunk::from_slice(0, &[7; 9]);
        let owned = chunk.take().unwrap();
        assert_eq!(owned.payload().as_slice(), &[7; 9]);
    }
}
