use core::fmt;

/// The error type for parsing of the network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An incoming packet could not be parsed because it was shorter than assumed.
    ///
    /// The packet may be shorter than the minimum length specified, a size longer than the actual
    /// payload. For variable length packets, this may be because some of its fields were out of
    /// bounds of the received data.
    Truncated,

    /// An incoming packet could not be recognized and was dropped.
    ///
    /// E.g. an ARP packet with a hardware type other than Ethernet or address length fields that
    /// contradict it. In most settings this is not fatal, the frame is simply ignored.
    Unrecognized,
}

/// The result type for the networking stack.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated    => write!(f, "truncated packet"),
            Error::Unrecognized => write!(f, "unrecognized packet"),
        }
    }
}
