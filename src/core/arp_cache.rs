use std::collections::HashMap;

use core::layers::{
    EthernetAddress,
    Ipv4Address,
};
use core::time::Milliseconds;

struct Entry {
    eth_addr: EthernetAddress,
    learned_at: Milliseconds,
}

/// Maintains an expiring set of IPv4 -> Ethernet address mappings.
///
/// A mapping is usable for a fixed number of milliseconds after it is
/// learned. Reads are age checked, so an expired entry is never returned
/// even before expire() has swept it out.
pub struct ArpCache {
    entries: HashMap<Ipv4Address, Entry>,
    expiration: Milliseconds,
}

impl ArpCache {
    /// Creates an ARP cache whose mappings expire after expiration
    /// milliseconds.
    pub fn new(expiration: Milliseconds) -> ArpCache {
        ArpCache {
            entries: HashMap::new(),
            expiration,
        }
    }

    /// Looks up the Ethernet address for an IPv4 address as of now.
    pub fn eth_addr_for_ip(
        &self,
        ipv4_addr: Ipv4Address,
        now: Milliseconds,
    ) -> Option<EthernetAddress> {
        match self.entries.get(&ipv4_addr) {
            Some(entry) if now - entry.learned_at < self.expiration => Some(entry.eth_addr),
            _ => None,
        }
    }

    /// Creates or refreshes the Ethernet address mapping for an IPv4
    /// address.
    pub fn set_eth_addr_for_ip(
        &mut self,
        ipv4_addr: Ipv4Address,
        eth_addr: EthernetAddress,
        now: Milliseconds,
    ) {
        self.entries.insert(
            ipv4_addr,
            Entry {
                eth_addr,
                learned_at: now,
            },
        );
    }

    /// Drops every mapping learned at least the expiration ago.
    pub fn expire(&mut self, now: Milliseconds) {
        let expiration = self.expiration;
        self.entries
            .retain(|_, entry| now - entry.learned_at < expiration);
    }
}
