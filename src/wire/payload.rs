//! Newtype wrappers of the fundamental byte-buffer `[u8]`.
use core::ops;

/// A specialized, internal variant of `Borrow<payload>`.
///
/// This ensures that the implementation is also consistent and always resolves to the same memory
/// region, an implementation detail that other parts of the crate could rely upon. The guarantee
/// is that the values in the referred to byte region will not appear differently, which is trivial
/// when we guarantee that the byte region is part of our object and does not change.
pub trait Payload {
    /// Retrieve the inner payload.
    fn payload(&self) -> &payload;
}

/// A specialized, internal variant of `BorrowMut<payload>`.
///
/// The same consistency considerations as for [`Payload`] apply.
///
/// [`Payload`]: trait.Payload.html
pub trait PayloadMut: Payload {
    /// Retrieve the mutable, inner payload.
    fn payload_mut(&mut self) -> &mut payload;
}

byte_wrapper! {
    /// A dynamically sized type representing a packet payload.
    ///
    /// This type is seemingly just a `[u8]`. It is a newtype wrapper so that this crate can freely
    /// implement traits for it but also restrict the standard trait implementations to not be
    /// available.
    #[derive(Debug, PartialEq, Eq)]
    pub struct payload([u8]);
}

/// Error variants for layout changes of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested size could not be provided.
    BadSize,
}

impl payload {
    /// View the payload as a shared byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// View the payload as an exclusive byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<'a> From<&'a [u8]> for &'a payload {
    fn from(val: &'a [u8]) -> &'a payload {
        payload::__from_macro_new_unchecked(val)
    }
}

impl<'a> From<&'a mut [u8]> for &'a mut payload {
    fn from(val: &'a mut [u8]) -> &'a mut payload {
        payload::__from_macro_new_unchecked_mut(val)
    }
}

impl<'a> From<&'a payload> for &'a [u8] {
    fn from(val: &'a payload) -> &'a [u8] {
        val.as_slice()
    }
}

impl<'a> From<&'a mut payload> for &'a mut [u8] {
    fn from(val: &'a mut payload) -> &'a mut [u8] {
        val.as_mut_slice()
    }
}

impl AsRef<[u8]> for payload {
    fn as_ref(&self) -> &[u8] {
        self.into()
    }
}

impl AsMut<[u8]> for payload {
    fn as_mut(&mut self) -> &mut [u8] {
        self.into()
    }
}

impl ops::Deref for payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl ops::DerefMut for payload {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Payload for [u8] {
    fn payload(&self) -> &payload {
        self.into()
    }
}

impl PayloadMut for [u8] {
    fn payload_mut(&mut self) -> &mut payload {
        self.into()
    }
}

impl Payload for payload {
    fn payload(&self) -> &payload {
        self
    }
}

impl PayloadMut for payload {
    fn payload_mut(&mut self) -> &mut payload {
        self
    }
}

#[cfg(feature = "std")]
impl Payload for Vec<u8> {
    fn payload(&self) -> &payload {
        self.as_slice().into()
    }
}

#[cfg(feature = "std")]
impl PayloadMut for Vec<u8> {
    fn payload_mut(&mut self) -> &mut payload {
        self.as_mut_slice().into()
    }
}
