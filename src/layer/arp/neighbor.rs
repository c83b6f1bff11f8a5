// Heads up! Before working on this file you should read, at least,
// the parts of RFC 1122 that discuss ARP.
use crate::managed::Slice;
use crate::wire::{EthernetAddress, Ipv4Address};

/// Lifecycle state of a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The slot holds nothing.
    Empty,
    /// A request went out, the mapping is awaited. May carry one deferred
    /// datagram.
    Pending,
    /// The mapping is known and usable for immediate sends.
    Stable,
    /// Marked for recycling during an aging pass.
    ///
    /// Purely transitional; the pass that marks a slot expired also empties
    /// it, so no public call ever observes this state.
    Expired,
}

/// One cache slot binding an IPv4 address to an Ethernet address.
///
/// The host allocates these, typically as a small array:
///
/// ```rust
/// use arpex::layer::arp::{Cache, Neighbor};
/// use arpex::storage::Chunk;
///
/// let mut slots: [Neighbor<Chunk>; 8] = Default::default();
/// let cache = Cache::new(&mut slots[..]);
/// # let _ = cache.lookup(arpex::wire::Ipv4Address::UNSPECIFIED);
/// ```
#[derive(Debug)]
pub struct Neighbor<P> {
    protocol_addr: Ipv4Address,
    hardware_addr: EthernetAddress,
    state: State,
    age: u8,
    queued: Option<P>,
}

/// Failure of a cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every slot is occupied by an in-flight resolution.
    ///
    /// Pending slots are never recycled; their loss would strand deferred
    /// traffic and forget that a request is outstanding.
    NoSpace,
}

impl From<Error> for crate::layer::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NoSpace => crate::layer::Error::Exhausted,
        }
    }
}

/// A bounded table of address mappings.
///
/// All mutable state of the resolver lives here. The table never allocates;
/// it borrows (or is handed) its slots from the host and recycles them in
/// place. Time is counted in aging calls, which the host makes roughly every
/// ten seconds.
#[derive(Debug)]
pub struct Cache<'a, P> {
    storage: Slice<'a, Neighbor<P>>,
}

impl<P> Neighbor<P> {
    /// The mapped IPv4 address, unspecified for an empty slot.
    pub fn protocol_addr(&self) -> Ipv4Address {
        self.protocol_addr
    }

    /// The mapped Ethernet address, known only for a stable entry.
    pub fn hardware_addr(&self) -> Option<EthernetAddress> {
        match self.state {
            State::Stable => Some(self.hardware_addr),
            _ => None,
        }
    }

    /// The lifecycle state of this slot.
    pub fn state(&self) -> State {
        self.state
    }

    /// Aging calls survived since creation or last refresh.
    pub fn age(&self) -> u8 {
        self.age
    }

    /// The datagram deferred until this entry resolves, if any.
    pub fn queued(&self) -> Option<&P> {
        self.queued.as_ref()
    }

    /// Whether the slot holds nothing.
    pub fn is_empty(&self) -> bool {
        self.state == State::Empty
    }

    /// Defer a datagram on this entry, handing back the one it displaces.
    ///
    /// At most one datagram is kept; the most recent wins.
    pub(crate) fn defer(&mut self, datagram: P) -> Option<P> {
        debug_assert_eq!(self.state, State::Pending);
        self.queued.replace(datagram)
    }

    /// Empty the slot, dropping any deferred datagram. The age is left
    /// behind; creation resets it.
    fn reset(&mut self) {
        self.protocol_addr = Ipv4Address::UNSPECIFIED;
        self.state = State::Empty;
        self.queued = None;
    }
}

impl<P> Default for Neighbor<P> {
    fn default() -> Self {
        Neighbor {
            protocol_addr: Ipv4Address::UNSPECIFIED,
            hardware_addr: EthernetAddress::default(),
            state: State::Empty,
            age: 0,
            queued: None,
        }
    }
}

impl<'a, P> Cache<'a, P> {
    /// Aging calls a stable entry survives without a refresh, twenty minutes
    /// at the nominal tick period.
    pub const MAX_AGE: u8 = 120;

    /// Aging calls an unanswered pending entry survives.
    pub const MAX_PENDING: u8 = 1;

    /// Create a cache over the given slots.
    ///
    /// The backing storage is emptied; anything in it is dropped.
    pub fn new<T>(storage: T) -> Cache<'a, P>
        where T: Into<Slice<'a, Neighbor<P>>>
    {
        let mut storage = storage.into();
        for slot in storage.as_mut_slice() {
            slot.reset();
            slot.age = 0;
        }
        Cache { storage }
    }

    /// The number of slots.
    pub fn capacity(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// View all slots, empty ones included.
    pub fn entries(&self) -> &[Neighbor<P>] {
        self.storage.as_slice()
    }

    /// Look up the hardware address of a stable entry.
    pub fn lookup(&self, protocol_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.storage.as_slice()
            .iter()
            .find(|slot| slot.state == State::Stable && slot.protocol_addr == protocol_addr)
            .map(|slot| slot.hardware_addr)
    }

    /// Learn a mapping, inserting a new entry if none exists.
    ///
    /// A pending entry goes stable; the datagram deferred on it, if any, is
    /// handed back and must be transmitted before the enclosing operation
    /// returns. A stable entry has its address overwritten and its age
    /// reset. When the table is full and nothing can be recycled the
    /// mapping is silently not recorded; resolution will simply happen
    /// again later.
    pub fn fill(&mut self, protocol_addr: Ipv4Address, hardware_addr: EthernetAddress) -> Option<P> {
        self.update_or_insert(protocol_addr, hardware_addr, true)
    }

    /// Learn a mapping only if an entry for it already exists.
    ///
    /// This is the passive variant used when snooping traffic that was not
    /// directed at us.
    pub fn refresh(&mut self, protocol_addr: Ipv4Address, hardware_addr: EthernetAddress) -> Option<P> {
        self.update_or_insert(protocol_addr, hardware_addr, false)
    }

    fn update_or_insert(
        &mut self,
        protocol_addr: Ipv4Address,
        hardware_addr: EthernetAddress,
        insert: bool,
    ) -> Option<P> {
        // never map the unspecified address
        if protocol_addr.is_unspecified() {
            net_debug!("cache: will not map {}", protocol_addr);
            return None;
        }

        if let Some(index) = self.position(protocol_addr) {
            let slot = &mut self.storage.as_mut_slice()[index];
            if slot.state == State::Pending {
                net_trace!("cache: pending entry for {} goes stable", protocol_addr);
                slot.state = State::Stable;
            }
            slot.hardware_addr = hardware_addr;
            slot.age = 0;
            return slot.queued.take();
        }

        if !insert {
            return None;
        }

        let index = match self.vacant() {
            Some(index) => index,
            None => {
                net_debug!("cache: no slot for {}", protocol_addr);
                return None;
            }
        };
        let slot = &mut self.storage.as_mut_slice()[index];
        slot.protocol_addr = protocol_addr;
        slot.hardware_addr = hardware_addr;
        slot.state = State::Stable;
        slot.age = 0;
        debug_assert!(slot.queued.is_none());
        None
    }

    /// Locate the entry for an address in resolution, creating a pending one
    /// if there is none yet.
    pub fn fill_looking(&mut self, protocol_addr: Ipv4Address) -> Result<&mut Neighbor<P>, Error> {
        let index = match self.position(protocol_addr) {
            Some(index) => index,
            None => {
                let index = self.vacant().ok_or(Error::NoSpace)?;
                let slot = &mut self.storage.as_mut_slice()[index];
                slot.protocol_addr = protocol_addr;
                slot.state = State::Pending;
                slot.age = 0;
                debug_assert!(slot.queued.is_none());
                net_trace!("cache: added pending entry for {}", protocol_addr);
                index
            }
        };
        Ok(&mut self.storage.as_mut_slice()[index])
    }

    /// One aging pass over the whole table.
    ///
    /// Every slot ages by one call. Stable entries older than [`MAX_AGE`]
    /// and pending entries older than [`MAX_PENDING`] are recycled, dropping
    /// whatever traffic was deferred on them.
    ///
    /// [`MAX_AGE`]: #associatedconstant.MAX_AGE
    /// [`MAX_PENDING`]: #associatedconstant.MAX_PENDING
    pub fn age(&mut self) {
        for slot in self.storage.as_mut_slice() {
            slot.age = slot.age.saturating_add(1);
            match slot.state {
                State::Stable if slot.age >= Self::MAX_AGE => {
                    net_trace!("cache: expired stable entry for {}", slot.protocol_addr);
                    slot.state = State::Expired;
                }
                State::Pending if slot.age >= Self::MAX_PENDING => {
                    net_trace!("cache: expired pending entry for {}", slot.protocol_addr);
                    slot.state = State::Expired;
                }
                _ => (),
            }
            if slot.state == State::Expired {
                slot.reset();
            }
        }
    }

    fn position(&self, protocol_addr: Ipv4Address) -> Option<usize> {
        self.storage.as_slice()
            .iter()
            .position(|slot| slot.state != State::Empty && slot.protocol_addr == protocol_addr)
    }

    /// A slot usable for a new entry: the first empty one, or failing that
    /// the oldest stable one, recycled. Pending slots are never victims.
    fn vacant(&mut self) -> Option<usize> {
        let mut oldest: Option<(usize, u8)> = None;
        for (index, slot) in self.storage.as_slice().iter().enumerate() {
            match slot.state {
                State::Empty => return Some(index),
                State::Stable => {
                    let older = match oldest {
                        Some((_, age)) => slot.age > age,
                        None => true,
                    };
                    if older {
                        oldest = Some((index, slot.age));
                    }
                }
                _ => (),
            }
        }

        let (index, _) = oldest?;
        net_trace!("cache: recycling oldest stable entry {}", index);
        self.storage.as_mut_slice()[index].reset();
        Some(index)
    }
}

impl<'a, P> From<Slice<'a, Neighbor<P>>> for Cache<'a, P> {
    fn from(storage: Slice<'a, Neighbor<P>>) -> Self {
        Cache::new(storage)
    }
}

impl<'a, P> From<&'a mut [Neighbor<P>]> for Cache<'a, P> {
    fn from(storage: &'a mut [Neighbor<P>]) -> Self {
        Cache::new(storage)
    }
}

#[cfg(feature = "std")]
impl<P> From<Vec<Neighbor<P>>> for Cache<'_, P> {
    fn from(storage: Vec<Neighbor<P>>) -> Self {
        Cache::new(storage)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const IP_ADDR_1: Ipv4Address = Ipv4Address([10, 0, 0, 1]);
    const IP_ADDR_2: Ipv4Address = Ipv4Address([10, 0, 0, 2]);
    const IP_ADDR_3: Ipv4Address = Ipv4Address([10, 0, 0, 3]);
    const IP_ADDR_4: Ipv4Address = Ipv4Address([10, 0, 0, 4]);

    const HADDR_A: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 1]);
    const HADDR_B: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 2]);
    const HADDR_C: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 3]);
    const HADDR_D: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 4]);

    fn cache<'a>(storage: &'a mut [Neighbor<&'static str>]) -> Cache<'a, &'static str> {
        Cache::new(storage)
    }

    #[test]
    fn fill() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        assert_eq!(cache.lookup(IP_ADDR_1), None);
        assert_eq!(cache.fill(IP_ADDR_1, HADDR_A), None);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
        assert_eq!(cache.lookup(IP_ADDR_2), None);
    }

    #[test]
    fn never_the_unspecified_address() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(Ipv4Address::UNSPECIFIED, HADDR_A);
        assert!(cache.entries().iter().all(Neighbor::is_empty));
    }

    #[test]
    fn replace() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(IP_ADDR_1, HADDR_A);
        cache.fill(IP_ADDR_1, HADDR_B);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_B));
        assert_eq!(cache.entries().iter().filter(|n| !n.is_empty()).count(), 1);
    }

    #[test]
    fn refresh_does_not_insert() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.refresh(IP_ADDR_1, HADDR_A);
        assert_eq!(cache.lookup(IP_ADDR_1), None);

        cache.fill(IP_ADDR_1, HADDR_A);
        cache.refresh(IP_ADDR_1, HADDR_B);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_B));
    }

    #[test]
    fn promotion_hands_back_the_deferred_datagram() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        let entry = cache.fill_looking(IP_ADDR_1).unwrap();
        assert_eq!(entry.state(), State::Pending);
        assert_eq!(entry.defer("ping"), None);
        assert_eq!(entry.defer("newer ping"), Some("ping"));

        assert_eq!(cache.fill(IP_ADDR_1, HADDR_A), Some("newer ping"));
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
        assert!(cache.entries().iter().all(|n| n.queued().is_none()));
    }

    #[test]
    fn evict_the_oldest_stable() {
        let mut storage: [Neighbor<_>; 2] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(IP_ADDR_1, HADDR_A);
        cache.age();
        cache.fill(IP_ADDR_2, HADDR_B);

        cache.fill(IP_ADDR_3, HADDR_C);
        assert_eq!(cache.lookup(IP_ADDR_1), None);
        assert_eq!(cache.lookup(IP_ADDR_2), Some(HADDR_B));
        assert_eq!(cache.lookup(IP_ADDR_3), Some(HADDR_C));
    }

    #[test]
    fn pending_is_never_a_victim() {
        let mut storage: [Neighbor<_>; 2] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill_looking(IP_ADDR_1).unwrap();
        cache.fill_looking(IP_ADDR_2).unwrap();

        assert_eq!(cache.fill_looking(IP_ADDR_3).err(), Some(Error::NoSpace));
        // learning can not displace them either
        cache.fill(IP_ADDR_4, HADDR_D);
        assert_eq!(cache.lookup(IP_ADDR_4), None);
    }

    #[test]
    fn stable_expires() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(IP_ADDR_1, HADDR_A);
        for _ in 0..Cache::<&'static str>::MAX_AGE - 1 {
            cache.age();
        }
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));

        cache.age();
        assert_eq!(cache.lookup(IP_ADDR_1), None);
        assert!(cache.entries().iter().all(Neighbor::is_empty));
    }

    #[test]
    fn pending_expires_and_drops_its_queue() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill_looking(IP_ADDR_1).unwrap().defer("stale");
        cache.age();
        assert!(cache.entries().iter().all(Neighbor::is_empty));
        assert!(cache.entries().iter().all(|n| n.queued().is_none()));

        // too late now
        assert_eq!(cache.fill(IP_ADDR_1, HADDR_A), None);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
    }

    #[test]
    fn refresh_keeps_entries_alive() {
        let mut storage: [Neighbor<_>; 3] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(IP_ADDR_1, HADDR_A);
        for _ in 0..Cache::<&'static str>::MAX_AGE - 1 {
            cache.age();
        }
        cache.refresh(IP_ADDR_1, HADDR_A);
        cache.age();
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
    }

    #[test]
    fn no_expired_survives_an_aging_pass() {
        let mut storage: [Neighbor<_>; 4] = Default::default();
        let mut cache = cache(&mut storage);

        cache.fill(IP_ADDR_1, HADDR_A);
        cache.fill_looking(IP_ADDR_2).unwrap();
        for _ in 0..=Cache::<&'static str>::MAX_AGE {
            cache.age();
            assert!(cache.entries().iter().all(|n| n.state() != State::Expired));
        }
    }
}
