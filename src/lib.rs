//! A bounded ARP resolver for a single network interface.
//!
//! This library binds IPv4 addresses to Ethernet hardware addresses for an
//! embedded, single-threaded TCP/IP stack. It mediates every outgoing IPv4
//! unicast to an on-link host: either the peer's MAC is cached and the frame
//! goes out immediately, or the datagram is parked on a pending cache entry
//! while a broadcast request solicits the peer. It also answers inbound
//! requests for the local address and opportunistically learns mappings from
//! passing traffic.
//!
//! Nothing in the core paths allocates. The host passes cache storage in
//! (see [`layer::arp::Neighbor`]), provides link buffers through the
//! [`nic::Device`] capability, and drives the resolver from its serialized
//! event pump: one inbound frame, one outbound call, or one aging tick at a
//! time. All resolver state lives in a per-interface [`layer::arp::Endpoint`]
//! handle; there are no globals.
//!
//! The modules are layered like the stack itself: [`wire`] contains the pure
//! packet codecs, [`storage`] the link-buffer facade, [`nic`] the interface
//! description and transmit capability, and [`layer`] the processing logic.
//!
//! [`layer::arp::Neighbor`]: layer/arp/struct.Neighbor.html
//! [`layer::arp::Endpoint`]: layer/arp/struct.Endpoint.html
//! [`nic::Device`]: nic/trait.Device.html
//! [`wire`]: wire/index.html
//! [`storage`]: storage/index.html
//! [`nic`]: nic/index.html
//! [`layer`]: layer/index.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use]
mod macros;
pub mod layer;
pub mod managed;
pub mod nic;
pub mod storage;
pub mod wire;
