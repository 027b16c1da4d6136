use {
    Error,
    Result,
};
use core::iface::Interface;
use core::layers::{
    Ipv4Address,
    Ipv4Packet,
};

/// A forwarding rule: traffic whose destination falls inside the prefix
/// leaves through one interface, towards an optional gateway.
#[derive(Clone, Copy, Debug)]
struct Route {
    prefix: Ipv4Address,
    prefix_len: u8,
    next_hop: Option<Ipv4Address>,
    iface: usize,
}

impl Route {
    fn matches(&self, dst_addr: Ipv4Address) -> bool {
        mask(dst_addr.as_u32(), self.prefix_len) == self.prefix.as_u32()
    }
}

/// Returns the top prefix_len bits of addr with the rest zeroed.
fn mask(addr: u32, prefix_len: u8) -> u32 {
    // Shifting a u32 by the full 32 bits overflows.
    if prefix_len == 0 {
        0
    } else {
        addr & (!0 << (32 - u32::from(prefix_len)))
    }
}

/// Moves IPv4 datagrams between interfaces by longest prefix match.
///
/// The router owns its interfaces; the host reaches them through
/// interface() to feed, drain and tick each one, and calls route() once
/// per iteration to forward everything that has arrived.
pub struct Router {
    interfaces: Vec<Interface>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Router {
        Router {
            interfaces: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Attaches an interface and returns its index.
    pub fn add_interface(&mut self, interface: Interface) -> usize {
        self.interfaces.push(interface);
        self.interfaces.len() - 1
    }

    /// Borrows the interface at index.
    pub fn interface(&mut self, index: usize) -> &mut Interface {
        &mut self.interfaces[index]
    }

    /// Registers a forwarding rule.
    ///
    /// The low 32 - prefix_len bits of route_prefix are ignored. A route
    /// without a next hop delivers each datagram to its own destination
    /// address, a directly connected network.
    ///
    /// # Errors
    ///
    /// A prefix length over 32 or an interface index that is not attached
    /// is a caller error and the route is not installed.
    pub fn add_route(
        &mut self,
        route_prefix: Ipv4Address,
        prefix_len: u8,
        next_hop: Option<Ipv4Address>,
        iface: usize,
    ) -> Result<()> {
        if prefix_len > 32 || iface >= self.interfaces.len() {
            return Err(Error::Route);
        }

        self.routes.push(Route {
            prefix: Ipv4Address::from_u32(mask(route_prefix.as_u32(), prefix_len)),
            prefix_len,
            next_hop,
            iface,
        });

        Ok(())
    }

    /// Forwards every datagram waiting on every interface.
    ///
    /// Datagrams arriving with a TTL of 1 or 0 are dropped, as are
    /// datagrams no route covers. Forwarded datagrams leave with the TTL
    /// decremented by one and the header checksum recomputed.
    pub fn route(&mut self) {
        for index in 0..self.interfaces.len() {
            while let Some(datagram) = self.interfaces[index].maybe_receive() {
                self.forward(datagram);
            }
        }
    }

    fn forward(&mut self, mut datagram: Ipv4Packet<Vec<u8>>) {
        let dst_addr = datagram.dst_addr();

        let ttl = datagram.ttl();
        if ttl <= 1 {
            debug!("dropping datagram for {} with expired TTL", dst_addr);
            return;
        }

        let route = match self.lookup(dst_addr) {
            Some(route) => route,
            None => {
                debug!("dropping datagram for {} with no route", dst_addr);
                return;
            }
        };

        datagram.set_ttl(ttl - 1);
        datagram.set_header_checksum(0);
        let header_checksum = datagram.gen_header_checksum();
        datagram.set_header_checksum(header_checksum);

        let next_hop = route.next_hop.unwrap_or(dst_addr);
        self.interfaces[route.iface].send_datagram(datagram, next_hop);
    }

    /// Finds the most specific route covering dst_addr. Ties on prefix
    /// length go to the earliest added route.
    fn lookup(&self, dst_addr: Ipv4Address) -> Option<Route> {
        let mut best: Option<Route> = None;

        for route in &self.routes {
            if !route.matches(dst_addr) {
                continue;
            }

            match best {
                Some(ref found) if route.prefix_len <= found.prefix_len => {}
                _ => best = Some(*route),
            }
        }

        best
    }
}
