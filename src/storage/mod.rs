//! Ownership and layout management of link buffers.
//!
//! Buffers cross a trust boundary here: the resolver parks datagrams it can
//! not yet address on cache entries and later hands them to the driver. Each
//! buffer is a uniquely owned value; queueing and transmission are moves and
//! releasing is `Drop`. The [`Buffer`] trait captures the two layout
//! operations the resolver needs beyond plain byte access.
//!
//! [`Buffer`]: trait.Buffer.html

#[cfg(feature = "std")]
mod chunk;

#[cfg(feature = "std")]
pub use self::chunk::Chunk;

use crate::wire::{PayloadError, PayloadMut};

/// A uniquely owned link buffer.
pub trait Buffer: PayloadMut + Sized {
    /// Extend the payload at its front by `reserve` octets.
    ///
    /// Used to place a link-layer header before a datagram handed down from
    /// the layer above. Implementations typically consume headroom reserved
    /// at allocation time; moving the payload is allowed but not required.
    /// On error the payload is unchanged.
    fn grow_head(&mut self, reserve: usize) -> Result<(), PayloadError>;

    /// Materialize the payload into storage owned by the returned buffer.
    ///
    /// A buffer whose payload merely borrows external memory (a DMA window,
    /// a driver-owned region) must be copied before it can outlive the call
    /// that produced it. Fully owned implementations return themselves
    /// unchanged. `None` when no storage for the copy is available.
    fn take(self) -> Option<Self>;
}
