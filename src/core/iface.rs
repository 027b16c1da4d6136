use std::collections::{
    HashMap,
    VecDeque,
};

use {
    Error,
    Result,
};
use core::arp_cache::ArpCache;
use core::layers::{
    eth_types,
    Arp,
    ArpOp,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4Packet,
};
use core::time::{
    Clock,
    Milliseconds,
};

/// How long a learned IPv4 -> Ethernet mapping stays usable.
pub const ARP_MAPPING_TTL: Milliseconds = 30_000;

/// How long before another ARP request may be broadcast for the same
/// address.
pub const ARP_REQUEST_RETRY: Milliseconds = 5_000;

/// One Ethernet attachment point with an IPv4 address.
///
/// The interface translates between the IPv4 datagrams the router deals in
/// and the Ethernet frames the link deals in, resolving next hop addresses
/// over ARP. Datagrams bound for an unresolved next hop are parked, in
/// order, until a mapping is learned.
///
/// The host drives the interface: frames come in through recv_frame and go
/// out through maybe_send, received datagrams surface through
/// maybe_receive, and time advances only through tick.
pub struct Interface {
    eth_addr: EthernetAddress,
    ipv4_addr: Ipv4Address,
    clock: Clock,
    arp_cache: ArpCache,
    /// When the in flight ARP request for each next hop was broadcast.
    requests: HashMap<Ipv4Address, Milliseconds>,
    /// Datagrams parked until their next hop resolves, oldest first.
    waiting: HashMap<Ipv4Address, VecDeque<Ipv4Packet<Vec<u8>>>>,
    frames_out: VecDeque<EthernetFrame<Vec<u8>>>,
    datagrams_in: VecDeque<Ipv4Packet<Vec<u8>>>,
}

impl Interface {
    pub fn new(eth_addr: EthernetAddress, ipv4_addr: Ipv4Address) -> Interface {
        Interface {
            eth_addr,
            ipv4_addr,
            clock: Clock::new(),
            arp_cache: ArpCache::new(ARP_MAPPING_TTL),
            requests: HashMap::new(),
            waiting: HashMap::new(),
            frames_out: VecDeque::new(),
            datagrams_in: VecDeque::new(),
        }
    }

    pub fn ethernet_addr(&self) -> EthernetAddress {
        self.eth_addr
    }

    pub fn ipv4_addr(&self) -> Ipv4Address {
        self.ipv4_addr
    }

    /// Sends an IPv4 datagram towards the directly reachable neighbor at
    /// next_hop.
    ///
    /// With a live mapping for the next hop the datagram goes straight onto
    /// the outbound queue. Otherwise it is parked under the next hop, and
    /// at most one ARP request per retry window is broadcast for the
    /// address, no matter how many datagrams pile up behind it.
    pub fn send_datagram(&mut self, datagram: Ipv4Packet<Vec<u8>>, next_hop: Ipv4Address) {
        let now = self.clock.now();

        if let Some(eth_dst_addr) = self.arp_cache.eth_addr_for_ip(next_hop, now) {
            self.send_ipv4_frame(eth_dst_addr, &datagram);
            return;
        }

        self.waiting
            .entry(next_hop)
            .or_insert_with(VecDeque::new)
            .push_back(datagram);

        let in_flight = match self.requests.get(&next_hop) {
            Some(&sent_at) => now - sent_at < ARP_REQUEST_RETRY,
            None => false,
        };

        if !in_flight {
            debug!("sending ARP request for {}", next_hop);

            let arp_repr = Arp::EthernetIpv4 {
                op: ArpOp::Request,
                source_hw_addr: self.eth_addr,
                source_proto_addr: self.ipv4_addr,
                target_hw_addr: EthernetAddress::NIL,
                target_proto_addr: next_hop,
            };

            self.send_arp_packet(EthernetAddress::BROADCAST, &arp_repr);
            self.requests.insert(next_hop, now);
        }
    }

    /// Receives one Ethernet frame from the link.
    ///
    /// Frames for other hosts are ignored without learning anything. ARP
    /// payloads update the neighbor state, release parked datagrams and may
    /// queue a reply; IPv4 payloads surface through maybe_receive.
    pub fn recv_frame(&mut self, eth_buffer: &[u8]) -> Result<()> {
        let eth_frame = EthernetFrame::try_new(eth_buffer)?;

        if eth_frame.dst_addr() != self.eth_addr && !eth_frame.dst_addr().is_broadcast() {
            debug!("ignoring frame for {}", eth_frame.dst_addr());
            return Err(Error::NoOp);
        }

        match eth_frame.payload_type() {
            eth_types::ARP => self.recv_arp_packet(eth_frame.payload()),
            eth_types::IPV4 => self.recv_ipv4_packet(eth_frame.payload()),
            i => {
                debug!("ignoring frame with payload type {}", i);
                Err(Error::NoOp)
            }
        }
    }

    /// Removes and returns the oldest outbound frame.
    pub fn maybe_send(&mut self) -> Option<EthernetFrame<Vec<u8>>> {
        self.frames_out.pop_front()
    }

    /// Removes and returns the oldest received datagram.
    pub fn maybe_receive(&mut self) -> Option<Ipv4Packet<Vec<u8>>> {
        self.datagrams_in.pop_front()
    }

    /// Advances the interface clock, expiring stale neighbor state.
    ///
    /// Mappings die ARP_MAPPING_TTL after they were learned. Request
    /// records die ARP_REQUEST_RETRY after broadcast, so a later
    /// send_datagram is free to ask again; the datagrams parked behind an
    /// expired request stay parked and are released by any later learn.
    pub fn tick(&mut self, elapsed: Milliseconds) {
        self.clock.advance(elapsed);
        let now = self.clock.now();

        self.arp_cache.expire(now);
        self.requests
            .retain(|_, &mut sent_at| now - sent_at < ARP_REQUEST_RETRY);
    }

    fn recv_ipv4_packet(&mut self, ipv4_buffer: &[u8]) -> Result<()> {
        let datagram = Ipv4Packet::try_new(ipv4_buffer.to_vec())?;
        datagram.check_encoding()?;

        self.datagrams_in.push_back(datagram);

        Ok(())
    }

    fn recv_arp_packet(&mut self, arp_buffer: &[u8]) -> Result<()> {
        let arp_repr = Arp::deserialize(arp_buffer)?;

        match arp_repr {
            Arp::EthernetIpv4 {
                op,
                source_hw_addr,
                source_proto_addr,
                target_proto_addr,
                ..
            } => {
                let now = self.clock.now();
                self.arp_cache
                    .set_eth_addr_for_ip(source_proto_addr, source_hw_addr, now);

                if op == ArpOp::Request && target_proto_addr == self.ipv4_addr {
                    debug!(
                        "sending ARP reply to {}/{}",
                        source_proto_addr, source_hw_addr
                    );

                    let arp_reply = Arp::EthernetIpv4 {
                        op: ArpOp::Reply,
                        source_hw_addr: self.eth_addr,
                        source_proto_addr: self.ipv4_addr,
                        target_hw_addr: source_hw_addr,
                        target_proto_addr: source_proto_addr,
                    };

                    self.send_arp_packet(source_hw_addr, &arp_reply);
                }

                self.flush_waiting(source_proto_addr, source_hw_addr);
            }
        }

        Ok(())
    }

    /// Releases everything parked behind ipv4_addr to the freshly learned
    /// eth_dst_addr, oldest first, and forgets the in flight request.
    fn flush_waiting(&mut self, ipv4_addr: Ipv4Address, eth_dst_addr: EthernetAddress) {
        self.requests.remove(&ipv4_addr);

        if let Some(datagrams) = self.waiting.remove(&ipv4_addr) {
            for datagram in datagrams {
                self.send_ipv4_frame(eth_dst_addr, &datagram);
            }
        }
    }

    fn send_ipv4_frame(&mut self, eth_dst_addr: EthernetAddress, datagram: &Ipv4Packet<Vec<u8>>) {
        self.send_eth_frame(
            eth_dst_addr,
            eth_types::IPV4,
            datagram.as_ref().len(),
            |payload| payload.copy_from_slice(datagram.as_ref()),
        );
    }

    fn send_arp_packet(&mut self, eth_dst_addr: EthernetAddress, arp_repr: &Arp) {
        self.send_eth_frame(
            eth_dst_addr,
            eth_types::ARP,
            arp_repr.buffer_len(),
            |payload| arp_repr.serialize(payload).unwrap(),
        );
    }

    /// Builds a frame from our address to eth_dst_addr and queues it for
    /// maybe_send, letting f fill in the payload.
    fn send_eth_frame<F>(
        &mut self,
        eth_dst_addr: EthernetAddress,
        payload_type: u16,
        payload_len: usize,
        f: F,
    ) where
        F: FnOnce(&mut [u8]),
    {
        let mut eth_buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(payload_len)];

        {
            let mut eth_frame = EthernetFrame::try_new(&mut eth_buffer[..]).unwrap();
            eth_frame.set_dst_addr(eth_dst_addr);
            eth_frame.set_src_addr(self.eth_addr);
            eth_frame.set_payload_type(payload_type);
            f(eth_frame.payload_mut());
        }

        self.frames_out
            .push_back(EthernetFrame::try_new(eth_buffer).unwrap());
    }
}
