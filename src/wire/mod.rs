//! Low-level packet access and construction.
//!
//! Each protocol comes in two levels of functionality. The lowercase types
//! (e.g. [`arp_packet`]) are byte wrappers giving field access over a raw
//! octet sequence; their accessors never panic after a successful
//! `check_len`. The `Repr` family (e.g. [`ArpRepr`]) is a compact, validated
//! high-level representation that can be created by parsing and written back
//! by emitting. `Repr::parse` never panics; `Repr::emit` never panics as
//! long as the buffer is at least `Repr::buffer_len()` octets long.
//!
//! The byte containers themselves are abstracted by [`Payload`] and
//! [`PayloadMut`], which model the relationship between a framing packet and
//! the memory region holding it.
//!
//! [`arp_packet`]: struct.arp_packet.html
//! [`ArpRepr`]: struct.ArpRepr.html
//! [`Payload`]: trait.Payload.html
//! [`PayloadMut`]: trait.PayloadMut.html

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod arp;
mod error;
mod ethernet;
mod ipv4;
#[path = "payload.rs"]
mod payload_impl;

pub use self::payload_impl::{
    payload,
    Error as PayloadError,
    Payload,
    PayloadMut};

pub use self::error::{
    Error,
    Result};

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    Repr as EthernetRepr};

pub use self::arp::{
    arp as arp_packet,
    Hardware as ArpHardware,
    Operation as ArpOperation,
    Repr as ArpRepr};

pub use self::ipv4::{
    ipv4 as ipv4_packet,
    Address as Ipv4Address,
    Cidr as Ipv4Cidr};
