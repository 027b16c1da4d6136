//! End to end forwarding scenarios: two hosts on different networks,
//! separated by a router. The test plays the role of the links, shuttling
//! frames between each host and the router interface it faces.

extern crate hopnet;
#[macro_use]
extern crate lazy_static;

use hopnet::core::iface::Interface;
use hopnet::core::layers::{
    EthernetAddress,
    Ipv4Address,
    Ipv4Packet,
};
use hopnet::core::router::Router;

lazy_static! {
    static ref HOST_A_IPV4: Ipv4Address = "192.168.0.2".parse().unwrap();
    static ref HOST_B_IPV4: Ipv4Address = "10.0.0.2".parse().unwrap();
    static ref GATEWAY_A_IPV4: Ipv4Address = "192.168.0.1".parse().unwrap();
    static ref GATEWAY_B_IPV4: Ipv4Address = "10.0.0.1".parse().unwrap();
}

fn eth(i: u8) -> EthernetAddress {
    EthernetAddress::new([0x02, 0, 0, 0, 0, i])
}

fn host_a() -> Interface {
    Interface::new(eth(0xA), *HOST_A_IPV4)
}

fn host_b() -> Interface {
    Interface::new(eth(0xB), *HOST_B_IPV4)
}

/// A router with interface 0 facing host A's network and interface 1
/// facing host B's.
fn router() -> Router {
    let mut router = Router::new();
    router.add_interface(Interface::new(eth(1), *GATEWAY_A_IPV4));
    router.add_interface(Interface::new(eth(2), *GATEWAY_B_IPV4));
    router
        .add_route("192.168.0.0".parse().unwrap(), 24, None, 0)
        .unwrap();
    router.add_route("10.0.0.0".parse().unwrap(), 8, None, 1).unwrap();
    router
}

fn datagram(src_addr: Ipv4Address, dst_addr: Ipv4Address, ttl: u8) -> Ipv4Packet<Vec<u8>> {
    let payload = b"coffee";
    let mut packet = Ipv4Packet::try_new(vec![0; Ipv4Packet::<&[u8]>::buffer_len(payload.len())])
        .unwrap();
    packet.set_ip_version(4);
    packet.set_header_len(5);
    packet.set_packet_len(26);
    packet.set_identification(99);
    packet.set_ttl(ttl);
    packet.set_protocol(17);
    packet.set_src_addr(src_addr);
    packet.set_dst_addr(dst_addr);
    let checksum = packet.gen_header_checksum();
    packet.set_header_checksum(checksum);
    packet.payload_mut().copy_from_slice(payload);
    packet
}

/// Shuttles frames between the two ends of a link until both go quiet.
fn exchange(a: &mut Interface, b: &mut Interface) {
    loop {
        let mut idle = true;

        while let Some(eth_frame) = a.maybe_send() {
            idle = false;
            let _ = b.recv_frame(eth_frame.as_ref());
        }

        while let Some(eth_frame) = b.maybe_send() {
            idle = false;
            let _ = a.recv_frame(eth_frame.as_ref());
        }

        if idle {
            break;
        }
    }
}

#[test]
fn forwards_between_hosts() {
    let mut host_a = host_a();
    let mut host_b = host_b();
    let mut router = router();

    host_a.send_datagram(datagram(*HOST_A_IPV4, *HOST_B_IPV4, 64), *GATEWAY_A_IPV4);
    exchange(&mut host_a, router.interface(0));
    router.route();
    exchange(router.interface(1), &mut host_b);

    let received = host_b.maybe_receive().expect("a forwarded datagram");
    assert_eq!(received.src_addr(), *HOST_A_IPV4);
    assert_eq!(received.dst_addr(), *HOST_B_IPV4);
    assert_eq!(received.ttl(), 63);
    assert_eq!(received.identification(), 99);
    assert_eq!(received.payload(), b"coffee");
    assert_eq!(received.gen_header_checksum(), 0);
    assert!(host_b.maybe_receive().is_none());
}

#[test]
fn forwards_the_reply_path_too() {
    let mut host_a = host_a();
    let mut host_b = host_b();
    let mut router = router();

    host_a.send_datagram(datagram(*HOST_A_IPV4, *HOST_B_IPV4, 64), *GATEWAY_A_IPV4);
    exchange(&mut host_a, router.interface(0));
    router.route();
    exchange(router.interface(1), &mut host_b);
    assert!(host_b.maybe_receive().is_some());

    host_b.send_datagram(datagram(*HOST_B_IPV4, *HOST_A_IPV4, 64), *GATEWAY_B_IPV4);
    exchange(&mut host_b, router.interface(1));
    router.route();
    exchange(router.interface(0), &mut host_a);

    let received = host_a.maybe_receive().expect("a reply datagram");
    assert_eq!(received.src_addr(), *HOST_B_IPV4);
    assert_eq!(received.dst_addr(), *HOST_A_IPV4);
    assert_eq!(received.ttl(), 63);
}

#[test]
fn queued_datagrams_arrive_in_order() {
    let mut host_a = host_a();
    let mut host_b = host_b();
    let mut router = router();

    for i in 0..5 {
        let mut packet = datagram(*HOST_A_IPV4, *HOST_B_IPV4, 64);
        packet.set_identification(i);
        packet.set_header_checksum(0);
        let checksum = packet.gen_header_checksum();
        packet.set_header_checksum(checksum);
        host_a.send_datagram(packet, *GATEWAY_A_IPV4);
    }

    exchange(&mut host_a, router.interface(0));
    router.route();
    exchange(router.interface(1), &mut host_b);

    for i in 0..5 {
        let received = host_b.maybe_receive().expect("a forwarded datagram");
        assert_eq!(received.identification(), i);
    }
    assert!(host_b.maybe_receive().is_none());
}

#[test]
fn drops_traffic_with_no_route() {
    let mut host_a = host_a();
    let mut router = router();

    host_a.send_datagram(
        datagram(*HOST_A_IPV4, "8.8.8.8".parse().unwrap(), 64),
        *GATEWAY_A_IPV4,
    );
    exchange(&mut host_a, router.interface(0));
    router.route();

    assert!(router.interface(0).maybe_send().is_none());
    assert!(router.interface(1).maybe_send().is_none());
}

#[test]
fn drops_traffic_out_of_hops() {
    let mut host_a = host_a();
    let mut router = router();

    host_a.send_datagram(datagram(*HOST_A_IPV4, *HOST_B_IPV4, 1), *GATEWAY_A_IPV4);
    exchange(&mut host_a, router.interface(0));
    router.route();

    assert!(router.interface(0).maybe_send().is_none());
    assert!(router.interface(1).maybe_send().is_none());
}
