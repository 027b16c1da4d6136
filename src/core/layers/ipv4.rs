use std;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use core::check::internet_checksum;
use core::layers::{
    Error,
    Result,
};

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) in network byte order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Address([u8; 4]);

impl Address {
    /// Creates an IPv4 address from a network byte order buffer.
    pub fn new(addr: [u8; 4]) -> Address {
        Address(addr)
    }

    /// Creates an IPv4 address from a network byte order slice.
    pub fn try_from(addr: &[u8]) -> Result<Address> {
        if addr.len() != 4 {
            return Err(Error::Buffer);
        }

        let mut bytes = [0; 4];
        bytes.copy_from_slice(addr);
        Ok(Address(bytes))
    }

    /// Creates an IPv4 address from its numeric form.
    pub fn from_u32(addr: u32) -> Address {
        let mut bytes = [0; 4];
        NetworkEndian::write_u32(&mut bytes, addr);
        Address(bytes)
    }

    /// Returns the numeric form of the address, for prefix arithmetic.
    pub fn as_u32(&self) -> u32 {
        NetworkEndian::read_u32(&self.0)
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl std::str::FromStr for Address {
    type Err = ();

    /// Parses an IPv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> std::result::Result<Address, Self::Err> {
        let mut bytes = [0; 4];
        let mut tokens = addr.split('.');

        for byte in bytes.iter_mut() {
            *byte = tokens.next().ok_or(())?.parse().map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(bytes))
    }
}

/// [https://en.wikipedia.org/wiki/IPv4](https://en.wikipedia.org/wiki/IPv4)
mod fields {
    use std;

    pub const VERSION_AND_HEADER_LEN: usize = 0;

    pub const PACKET_LEN: std::ops::Range<usize> = 2..4;

    pub const IDENTIFICATION: std::ops::Range<usize> = 4..6;

    pub const TTL: usize = 8;

    pub const PROTOCOL: usize = 9;

    pub const CHECKSUM: std::ops::Range<usize> = 10..12;

    pub const SRC_ADDR: std::ops::Range<usize> = 12..16;

    pub const DST_ADDR: std::ops::Range<usize> = 16..20;
}

/// IPv4 packet represented as a byte buffer.
#[derive(Debug)]
pub struct Packet<T>
where
    T: AsRef<[u8]>,
{
    buffer: T,
}

impl<T> Packet<T>
where
    T: AsRef<[u8]>,
{
    pub const MIN_HEADER_LEN: usize = 20;

    /// Wraps and represents the buffer as an IPv4 packet.
    ///
    /// # Errors
    ///
    /// Causes an error if the buffer is shorter than the minimum header or
    /// longer than the length field can express. Check the encoding with
    /// check_encoding() when the buffer came off the wire; other member
    /// functions may panic on inconsistent length fields.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        let buffer_len = buffer.as_ref().len();

        if buffer_len < Self::MIN_HEADER_LEN || buffer_len > u16::max_value() as usize {
            return Err(Error::Buffer);
        }

        Ok(Packet { buffer })
    }

    /// Returns the length of an IPv4 packet with no options and the
    /// specified payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::MIN_HEADER_LEN + payload_len
    }

    /// Checks that the version and length fields are consistent with the
    /// buffer.
    ///
    /// The header checksum is not validated; datagrams travel with whatever
    /// checksum the sender computed.
    pub fn check_encoding(&self) -> Result<()> {
        if self.ip_version() != 4
            || self.header_len() < 5
            || self.header_len() as usize * 4 > self.buffer.as_ref().len()
            || (self.packet_len() as usize) > self.buffer.as_ref().len()
            || (self.packet_len() as usize) < self.header_len() as usize * 4
        {
            return Err(Error::Encoding);
        }

        Ok(())
    }

    /// Calculates a checksum over the entire header, including the checksum
    /// field itself. Zero the field first when generating a fresh checksum.
    pub fn gen_header_checksum(&self) -> u16 {
        let header_len = self.header_len() as usize * 4;
        internet_checksum(&self.buffer.as_ref()[..header_len])
    }

    pub fn ip_version(&self) -> u8 {
        (self.buffer.as_ref()[fields::VERSION_AND_HEADER_LEN] & 0xF0) >> 4
    }

    /// Gets the header length in 32 bit words.
    pub fn header_len(&self) -> u8 {
        self.buffer.as_ref()[fields::VERSION_AND_HEADER_LEN] & 0x0F
    }

    pub fn packet_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::PACKET_LEN])
    }

    pub fn identification(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::IDENTIFICATION])
    }

    pub fn ttl(&self) -> u8 {
        self.buffer.as_ref()[fields::TTL]
    }

    pub fn protocol(&self) -> u8 {
        self.buffer.as_ref()[fields::PROTOCOL]
    }

    pub fn header_checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::CHECKSUM])
    }

    pub fn src_addr(&self) -> Address {
        Address::try_from(&self.buffer.as_ref()[fields::SRC_ADDR]).unwrap()
    }

    pub fn dst_addr(&self) -> Address {
        Address::try_from(&self.buffer.as_ref()[fields::DST_ADDR]).unwrap()
    }

    /// Returns an immutable view of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[self.header_len() as usize * 4..]
    }
}

impl<T> Packet<T>
where
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    pub fn set_ip_version(&mut self, version: u8) {
        self.buffer.as_mut()[fields::VERSION_AND_HEADER_LEN] &= !0xF0;
        self.buffer.as_mut()[fields::VERSION_AND_HEADER_LEN] |= version << 4;
    }

    /// Sets the header length in 32 bit words.
    pub fn set_header_len(&mut self, header_len: u8) {
        self.buffer.as_mut()[fields::VERSION_AND_HEADER_LEN] &= !0x0F;
        self.buffer.as_mut()[fields::VERSION_AND_HEADER_LEN] |= header_len & 0x0F;
    }

    pub fn set_packet_len(&mut self, packet_len: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::PACKET_LEN], packet_len);
    }

    pub fn set_identification(&mut self, id: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::IDENTIFICATION], id);
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.buffer.as_mut()[fields::TTL] = ttl;
    }

    pub fn set_protocol(&mut self, protocol: u8) {
        self.buffer.as_mut()[fields::PROTOCOL] = protocol;
    }

    pub fn set_header_checksum(&mut self, header_checksum: u16) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::CHECKSUM],
            header_checksum,
        );
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    /// Returns a mutable view of the payload.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let header_len = self.header_len() as usize * 4;
        &mut self.buffer.as_mut()[header_len..]
    }
}

impl<T> AsRef<[u8]> for Packet<T>
where
    T: AsRef<[u8]>,
{
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}
