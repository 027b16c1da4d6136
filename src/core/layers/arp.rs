use std;
use std::io::Write;

use byteorder::{
    NetworkEndian,
    ReadBytesExt,
    WriteBytesExt,
};

use core::layers::{
    Error,
    EthernetAddress,
    Ipv4Address,
    Result,
};

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-1
pub enum Op {
    Request = 0x0001,
    Reply = 0x0002,
}

/// Type codes for the Ethernet/IPv4 pairing.
mod codes {
    pub const HW_ETHERNET: u16 = 0x0001;

    pub const PROTO_IPV4: u16 = 0x0800;

    pub const HW_ADDR_LEN: u8 = 6;

    pub const PROTO_ADDR_LEN: u8 = 4;
}

/// An ARP packet in parsed form.
///
/// Only the Ethernet/IPv4 pairing is represented; anything else on the wire
/// deserializes to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arp {
    EthernetIpv4 {
        op: Op,
        source_hw_addr: EthernetAddress,
        source_proto_addr: Ipv4Address,
        target_hw_addr: EthernetAddress,
        target_proto_addr: Ipv4Address,
    },
}

impl Arp {
    /// Returns the size of the ARP packet when serialized to a buffer.
    pub fn buffer_len(&self) -> usize {
        match *self {
            Arp::EthernetIpv4 { .. } => 28,
        }
    }

    /// Attempts to deserialize a buffer into an ARP packet.
    pub fn deserialize(buffer: &[u8]) -> Result<Arp> {
        if buffer.len() < 28 {
            return Err(Error::Buffer);
        }

        let mut reader = std::io::Cursor::new(buffer);
        let hw_type = reader.read_u16::<NetworkEndian>().unwrap();
        let proto_type = reader.read_u16::<NetworkEndian>().unwrap();
        let hw_addr_len = reader.read_u8().unwrap();
        let proto_addr_len = reader.read_u8().unwrap();
        let op = reader.read_u16::<NetworkEndian>().unwrap();

        if hw_type != codes::HW_ETHERNET
            || proto_type != codes::PROTO_IPV4
            || hw_addr_len != codes::HW_ADDR_LEN
            || proto_addr_len != codes::PROTO_ADDR_LEN
        {
            return Err(Error::Encoding);
        }

        let op = match op {
            0x0001 => Op::Request,
            0x0002 => Op::Reply,
            _ => return Err(Error::Encoding),
        };

        Ok(Arp::EthernetIpv4 {
            op,
            source_hw_addr: EthernetAddress::try_from(&buffer[8..14]).unwrap(),
            source_proto_addr: Ipv4Address::try_from(&buffer[14..18]).unwrap(),
            target_hw_addr: EthernetAddress::try_from(&buffer[18..24]).unwrap(),
            target_proto_addr: Ipv4Address::try_from(&buffer[24..28]).unwrap(),
        })
    }

    /// Serializes the ARP packet into a buffer.
    ///
    /// The buffer should have at least buffer_len() bytes to avoid errors.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Buffer);
        }

        match *self {
            Arp::EthernetIpv4 {
                op,
                ref source_hw_addr,
                ref source_proto_addr,
                ref target_hw_addr,
                ref target_proto_addr,
            } => {
                let mut writer = std::io::Cursor::new(buffer);
                writer
                    .write_u16::<NetworkEndian>(codes::HW_ETHERNET)
                    .unwrap();
                writer.write_u16::<NetworkEndian>(codes::PROTO_IPV4).unwrap();
                writer.write_u8(codes::HW_ADDR_LEN).unwrap();
                writer.write_u8(codes::PROTO_ADDR_LEN).unwrap();
                writer.write_u16::<NetworkEndian>(op as u16).unwrap();
                writer.write_all(source_hw_addr.as_bytes()).unwrap();
                writer.write_all(source_proto_addr.as_bytes()).unwrap();
                writer.write_all(target_hw_addr.as_bytes()).unwrap();
                writer.write_all(target_proto_addr.as_bytes()).unwrap();
            }
        }

        Ok(())
    }
}
