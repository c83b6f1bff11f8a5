//! Description of a network interface and its transmit capability.
//!
//! The resolver never talks to hardware. It reads addressing configuration
//! from an [`Interface`] value and hands fully formed Ethernet frames to a
//! [`Device`], which also allocates the buffers for frames the resolver
//! originates itself. A software implementation of the device is as good as
//! a real one; [`Sink`] records frames for tests and examples.
//!
//! [`Interface`]: struct.Interface.html
//! [`Device`]: trait.Device.html
//! [`Sink`]: struct.Sink.html

#[cfg(feature = "std")]
mod sink;

#[cfg(feature = "std")]
pub use self::sink::Sink;

use crate::layer::Result;
use crate::storage::Buffer;
use crate::wire::{EthernetAddress, Ipv4Address, Ipv4Cidr};

/// Addressing configuration of one network interface.
///
/// Carries the local hardware address, the local IPv4 address with its
/// subnet, and optionally the gateway for traffic leaving the subnet. An
/// interface whose IPv4 address is unspecified is unconfigured: it answers
/// no requests and claims no traffic, but may still probe (e.g. for DHCP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    hwaddr: EthernetAddress,
    addr: Ipv4Cidr,
    gateway: Option<Ipv4Address>,
}

impl Interface {
    /// Describe an interface by its hardware address and IPv4 subnet, without a gateway.
    pub fn new(hwaddr: EthernetAddress, addr: Ipv4Cidr) -> Self {
        Interface { hwaddr, addr, gateway: None }
    }

    /// Set or clear the gateway used for destinations outside the subnet.
    pub fn set_gateway(&mut self, gateway: Option<Ipv4Address>) {
        self.gateway = gateway;
    }

    /// The local hardware address.
    pub fn hwaddr(&self) -> EthernetAddress {
        self.hwaddr
    }

    /// The local IPv4 address.
    pub fn address(&self) -> Ipv4Address {
        self.addr.address()
    }

    /// The local IPv4 subnet.
    pub fn cidr(&self) -> Ipv4Cidr {
        self.addr
    }

    /// The configured gateway, if any.
    pub fn gateway(&self) -> Option<Ipv4Address> {
        self.gateway
    }

    /// Whether an IPv4 address has been assigned yet.
    pub fn is_configured(&self) -> bool {
        !self.address().is_unspecified()
    }

    /// Whether `addr` names this interface.
    pub fn accepts(&self, addr: Ipv4Address) -> bool {
        self.is_configured() && addr == self.address()
    }

    /// Whether `addr` is the limited or the subnet directed broadcast address.
    pub fn is_broadcast(&self, addr: Ipv4Address) -> bool {
        addr.is_broadcast() || self.addr.broadcast() == Some(addr)
    }

    /// Whether `addr` can be reached on this link without a gateway.
    pub fn on_link(&self, addr: Ipv4Address) -> bool {
        self.addr.contains_addr(&addr)
    }
}

/// The transmit side of a link-layer device.
///
/// `transmit` corresponds to a driver-level enqueue: it must not block and
/// must not feed received frames back into the resolver synchronously.
/// Ownership of the frame passes to the device.
pub trait Device {
    /// The buffer type frames of this device are carried in.
    type Payload: Buffer;

    /// Allocate a link buffer able to hold `len` octets of frame data.
    ///
    /// `None` when the transmit pool is exhausted; the caller degrades
    /// gracefully.
    fn alloc(&mut self, len: usize) -> Option<Self::Payload>;

    /// Hand a fully formed Ethernet frame to the driver for transmission.
    fn transmit(&mut self, frame: Self::Payload) -> Result<()>;
}

#[cfg(test)]
mod test {
    use super::*;

    const HWADDR: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0x02]);

    fn iface() -> Interface {
        let mut iface = Interface::new(
            HWADDR,
            Ipv4Cidr::new(Ipv4Address::new(10, 0, 0, 2), 24));
        iface.set_gateway(Some(Ipv4Address::new(10, 0, 0, 1)));
        iface
    }

    #[test]
    fn addressing() {
        let iface = iface();
        assert!(iface.is_configured());
        assert!(iface.accepts(Ipv4Address::new(10, 0, 0, 2)));
        assert!(!iface.accepts(Ipv4Address::new(10, 0, 0, 3)));
        assert!(iface.on_link(Ipv4Address::new(10, 0, 0, 200)));
        assert!(!iface.on_link(Ipv4Address::new(192, 168, 0, 1)));
        assert!(iface.is_broadcast(Ipv4Address::BROADCAST));
        assert!(iface.is_broadcast(Ipv4Address::new(10, 0, 0, 255)));
        assert!(!iface.is_broadcast(Ipv4Address::new(10, 0, 1, 255)));
    }

    #[test]
    fn unconfigured() {
        let iface = Interface::new(
            HWADDR,
            Ipv4Cidr::new(Ipv4Address::UNSPECIFIED, 0));
        assert!(!iface.is_configured());
        assert!(!iface.accepts(Ipv4Address::UNSPECIFIED));
    }
}
