//! The resolver's public operations.
//!
//! Everything here runs to completion without yielding; the host's event
//! pump serializes inbound frames, outbound calls, and aging ticks. Buffer
//! ownership is strictly by move: a frame handed to [`Device::transmit`]
//! belongs to the driver, a datagram deferred on the cache belongs to the
//! cache, and every error path drops what it could not forward.
//!
//! [`Device::transmit`]: ../../nic/trait.Device.html#tymethod.transmit

use crate::layer::{Error, Result};
use crate::nic::{Device, Interface};
use crate::storage::Buffer;
use crate::wire::{arp_packet, ethernet_frame, ipv4_packet};
use crate::wire::{ArpOperation, ArpRepr, EthernetAddress, EthernetProtocol, EthernetRepr, Ipv4Address, Payload, PayloadMut};

use super::neighbor::Cache;
use super::ReplyHook;

/// The persistent state of the resolver, one per interface.
///
/// Owns the neighbor cache and nothing else; addressing configuration comes
/// in with every call so the host remains free to reconfigure the interface
/// between events.
pub struct Endpoint<'data, P> {
    neighbors: Cache<'data, P>,
}

impl<'data, P> Endpoint<'data, P> {
    /// Create the resolver state over host supplied cache slots.
    pub fn new<C>(neighbors: C) -> Self
        where C: Into<Cache<'data, P>>,
    {
        Endpoint {
            neighbors: neighbors.into(),
        }
    }

    /// Read access to the neighbor cache.
    pub fn neighbors(&self) -> &Cache<'data, P> {
        &self.neighbors
    }

    /// Write access to the neighbor cache, e.g. to preconfigure static
    /// entries.
    pub fn neighbors_mut(&mut self) -> &mut Cache<'data, P> {
        &mut self.neighbors
    }

    /// One aging pass; call roughly every ten seconds.
    pub fn tick(&mut self) {
        self.neighbors.age();
    }
}

impl<'data, P: Buffer> Endpoint<'data, P> {
    /// Address and transmit an outgoing IPv4 datagram.
    ///
    /// The datagram must carry headroom for the Ethernet header, which this
    /// call fills in. Broadcast and multicast destinations are addressed
    /// immediately; unicast destinations go through the cache, possibly via
    /// the gateway, and may leave the datagram deferred on a pending entry
    /// instead of transmitting it now.
    ///
    /// On success ownership of the datagram has moved to the device or to
    /// the cache; on error it has been dropped.
    pub fn send<D>(
        &mut self,
        iface: &Interface,
        nic: &mut D,
        dst_addr: Ipv4Address,
        mut datagram: P,
    ) -> Result<()>
        where D: Device<Payload = P>,
    {
        if datagram.grow_head(ethernet_frame::header_len()).is_err() {
            net_debug!("send: could not make room for ethernet header");
            return Err(Error::BadSize);
        }

        let dst = if dst_addr.is_unspecified() || iface.is_broadcast(dst_addr) {
            Some(EthernetAddress::BROADCAST)
        } else if dst_addr.is_multicast() {
            Some(EthernetAddress::multicast(dst_addr))
        } else {
            None
        };

        if let Some(dst) = dst {
            Self::emit_header(iface, &mut datagram, dst, EthernetProtocol::Ipv4);
            return nic.transmit(datagram);
        }

        let next_hop = if iface.on_link(dst_addr) {
            dst_addr
        } else {
            match iface.gateway() {
                Some(gateway) => gateway,
                None => {
                    net_debug!("send: {} is off-link and there is no gateway", dst_addr);
                    return Err(Error::Unreachable);
                }
            }
        };

        self.query(iface, nic, next_hop, Some(datagram))
    }

    /// Solicit the mapping for `target` and handle an optional datagram.
    ///
    /// Always emits one broadcast request first, then locates or creates
    /// the cache entry, then either transmits the datagram (entry stable)
    /// or defers it on the entry (pending). The fixed order lets the
    /// request go out before any cache mutation. The datagram, if given,
    /// must carry a filled-in or blank Ethernet header in front of its
    /// payload already.
    ///
    /// Calling this with the local address as target and no datagram is the
    /// gratuitous announcement, see [`announce`].
    ///
    /// [`announce`]: #method.announce
    pub fn query<D>(
        &mut self,
        iface: &Interface,
        nic: &mut D,
        target: Ipv4Address,
        datagram: Option<P>,
    ) -> Result<()>
        where D: Device<Payload = P>,
    {
        let mut result = self.request(iface, nic, target);

        // never enter the unspecified address into the cache; a probe from
        // an unconfigured host asks for it without wanting an entry
        if target.is_unspecified() {
            return result;
        }

        let entry = match self.neighbors.fill_looking(target) {
            Ok(entry) => entry,
            Err(err) => {
                net_debug!("query: no cache slot for {}", target);
                return Err(err.into());
            }
        };

        let datagram = match datagram {
            Some(datagram) => datagram,
            None => return result,
        };

        if let Some(mac) = entry.hardware_addr() {
            let mut datagram = datagram;
            Self::emit_header(iface, &mut datagram, mac, EthernetProtocol::Ipv4);
            return nic.transmit(datagram);
        }

        #[cfg(feature = "queueing")]
        {
            match datagram.take() {
                Some(owned) => {
                    net_trace!("query: deferred datagram for {}", target);
                    if entry.defer(owned).is_some() {
                        net_debug!("query: replaced the datagram deferred for {}", target);
                    }
                }
                None => {
                    net_debug!("query: could not take ownership of datagram for {}", target);
                    result = Err(Error::Exhausted);
                }
            }
        }
        #[cfg(not(feature = "queueing"))]
        {
            // without queueing support the datagram is dropped here and the
            // peer is resolved for the retransmission
            let _ = datagram;
        }

        result
    }

    /// Announce the local mapping by a gratuitous request.
    ///
    /// Sender and target address are both the local address, informing peers
    /// of a newly configured or changed mapping.
    pub fn announce<D>(&mut self, iface: &Interface, nic: &mut D) -> Result<()>
        where D: Device<Payload = P>,
    {
        self.query(iface, nic, iface.address(), None)
    }

    /// Learn from an IPv4 frame about to be delivered upwards.
    ///
    /// Call before the IP layer sees the frame. Learns the sender mapping if
    /// the sender is on-link; never touches the frame otherwise. The device
    /// is needed only to flush traffic a learned mapping may release.
    pub fn snoop<D, F>(&mut self, iface: &Interface, nic: &mut D, frame: &F)
        where D: Device<Payload = P>, F: Payload + ?Sized,
    {
        let eth = match ethernet_frame::new_checked(frame.payload().as_slice()) {
            Ok(eth) => eth,
            Err(_) => return,
        };
        if eth.ethertype() != EthernetProtocol::Ipv4 {
            return;
        }
        let packet = match ipv4_packet::new_checked(eth.payload()) {
            Ok(packet) => packet,
            Err(_) => return,
        };

        let src_addr = packet.src_addr();
        if !iface.on_link(src_addr) {
            return;
        }

        net_trace!("snoop: learning {} from passing traffic", src_addr);
        let flushed = self.neighbors.fill(src_addr, eth.src_addr());
        Self::flush(iface, nic, eth.src_addr(), flushed);
    }

    /// Process an inbound ARP frame, consuming the buffer.
    ///
    /// Learns the sender mapping (inserting only when the frame targets the
    /// local address), answers requests for us by rewriting the buffer into
    /// a reply, and drops everything else. Malformed frames are dropped
    /// silently. This variant discards reply notifications; see
    /// [`receive_with`] to observe them.
    ///
    /// [`receive_with`]: #method.receive_with
    pub fn receive<D>(&mut self, iface: &Interface, nic: &mut D, frame: P)
        where D: Device<Payload = P>,
    {
        self.receive_with(iface, nic, frame, &mut ())
    }

    /// Process an inbound ARP frame, notifying `hook` of replies for us.
    pub fn receive_with<D, H>(&mut self, iface: &Interface, nic: &mut D, mut frame: P, hook: &mut H)
        where D: Device<Payload = P>, H: ReplyHook,
    {
        let repr = {
            let eth = match ethernet_frame::new_checked(frame.payload().as_slice()) {
                Ok(eth) => eth,
                Err(_) => {
                    net_debug!("receive: frame too short, dropped");
                    return;
                }
            };
            let packet = match arp_packet::new_checked(eth.payload()) {
                Ok(packet) => packet,
                Err(_) => {
                    net_debug!("receive: packet too short, dropped");
                    return;
                }
            };
            match ArpRepr::parse(packet) {
                Ok(repr) => repr,
                Err(_) => {
                    net_debug!("receive: not an Ethernet to IPv4 mapping, dropped");
                    return;
                }
            }
        };

        let for_us = iface.accepts(repr.target_protocol_addr);

        // learn from the sender pair first; this may release deferred
        // traffic towards the sender
        let flushed = if for_us {
            self.neighbors.fill(repr.source_protocol_addr, repr.source_hardware_addr)
        } else {
            self.neighbors.refresh(repr.source_protocol_addr, repr.source_hardware_addr)
        };
        Self::flush(iface, nic, repr.source_hardware_addr, flushed);

        match repr.operation {
            ArpOperation::Request if for_us => {
                net_trace!("receive: answering request from {}", repr.source_protocol_addr);
                Self::answer(iface, &mut frame, &repr);
                if nic.transmit(frame).is_err() {
                    net_debug!("receive: reply could not be transmitted");
                }
            }
            ArpOperation::Request => {
                // not for us; an unconfigured interface stays silent too
            }
            ArpOperation::Reply => {
                if for_us {
                    hook.on_reply(repr.source_protocol_addr);
                }
            }
            ArpOperation::Unknown(operation) => {
                net_debug!("receive: unknown operation {}, dropped", operation);
            }
        }
    }

    /// Emit one broadcast request for `target`, consuming a fresh buffer.
    fn request<D>(&mut self, iface: &Interface, nic: &mut D, target: Ipv4Address) -> Result<()>
        where D: Device<Payload = P>,
    {
        let mut frame = match nic.alloc(ethernet_frame::buffer_len(arp_packet::header_len())) {
            Some(frame) => frame,
            None => {
                net_debug!("request: no buffer for {}", target);
                return Err(Error::Exhausted);
            }
        };

        Self::emit_header(iface, &mut frame, EthernetAddress::BROADCAST, EthernetProtocol::Arp);
        {
            let eth = ethernet_frame::new_unchecked_mut(frame.payload_mut().as_mut_slice());
            let packet = arp_packet::new_unchecked_mut(eth.payload_mut());
            ArpRepr {
                operation: ArpOperation::Request,
                source_hardware_addr: iface.hwaddr(),
                source_protocol_addr: iface.address(),
                // the answer to the question, a don't-care in requests
                target_hardware_addr: EthernetAddress::default(),
                target_protocol_addr: target,
            }.emit(packet);
        }

        net_trace!("request: asking for {}", target);
        nic.transmit(frame)
    }

    /// Rewrite a request in place into the reply to it.
    fn answer(iface: &Interface, frame: &mut P, request: &ArpRepr) {
        Self::emit_header(iface, frame, request.source_hardware_addr, EthernetProtocol::Arp);
        let eth = ethernet_frame::new_unchecked_mut(frame.payload_mut().as_mut_slice());
        let packet = arp_packet::new_unchecked_mut(eth.payload_mut());
        ArpRepr {
            operation: ArpOperation::Reply,
            source_hardware_addr: iface.hwaddr(),
            source_protocol_addr: iface.address(),
            target_hardware_addr: request.source_hardware_addr,
            target_protocol_addr: request.source_protocol_addr,
        }.emit(packet);
    }

    /// Fill the Ethernet header of a released datagram and send it on.
    ///
    /// Errors stay here: the caller that deferred the datagram has long
    /// returned.
    fn flush<D>(iface: &Interface, nic: &mut D, mac: EthernetAddress, flushed: Option<P>)
        where D: Device<Payload = P>,
    {
        if let Some(mut datagram) = flushed {
            net_trace!("flush: sending deferred datagram to {}", mac);
            Self::emit_header(iface, &mut datagram, mac, EthernetProtocol::Ipv4);
            if nic.transmit(datagram).is_err() {
                net_debug!("flush: deferred datagram could not be transmitted");
            }
        }
    }

    fn emit_header(iface: &Interface, frame: &mut P, dst_addr: EthernetAddress, ethertype: EthernetProtocol) {
        let eth = ethernet_frame::new_unchecked_mut(frame.payload_mut().as_mut_slice());
        EthernetRepr {
            src_addr: iface.hwaddr(),
            dst_addr,
            ethertype,
        }.emit(eth);
    }
}
