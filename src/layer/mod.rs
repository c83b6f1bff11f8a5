//! The process logic of protocol layers.
//!
//! Each protocol layer is split into two parts; the packet logic contained
//! in `wire` and the processing part in this module. An endpoint represents
//! the local state of a protocol. This state can be used to process packets
//! of that layer and is open to modification while processing does not take
//! place, similar to reconfiguration on the OS level with utilities such as
//! `arp` or `ifconfig`.
//!
//! Only one layer lives here: address resolution. The layers above and below
//! it (IP and the link driver) are this crate's callers.

pub mod arp;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The error type of layer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted on this input.
    ///
    /// Returned when a packet can not be interpreted in the way the
    /// operation requires.
    Illegal,

    /// Not enough space for the requested packet.
    ///
    /// In particular, the layer could not make room in front of a payload
    /// for the header it needs to prepend.
    BadSize,

    /// Unable to find a route towards the destination address.
    ///
    /// The destination is outside the local subnet and no gateway is
    /// configured.
    Unreachable,

    /// The action could not be completed because there were not enough resources.
    ///
    /// No link buffer could be allocated, or the cache is fully occupied by
    /// in-flight resolutions. In contrast to `Illegal` this implies the same
    /// call could succeed later.
    Exhausted,
}

/// A standard wrapper for a function implementing a handler trait.
///
/// Keeps the type alias overhead low by providing a single wrapper type that
/// adapts closures to the handler traits of the layers, where applicable.
pub struct FnHandler<F>(pub F);

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}

/// Can convert from a payload error.
///
/// One common cause is failure to resize the buffer to the necessary size.
impl From<crate::wire::PayloadError> for Error {
    fn from(err: crate::wire::PayloadError) -> Self {
        use crate::wire::PayloadError;
        match err {
            PayloadError::BadSize => Error::BadSize,
        }
    }
}
