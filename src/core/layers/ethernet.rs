use std;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use core::layers::{
    Error,
    Result,
};

/// [MAC address](https://en.wikipedia.org/wiki/MAC_address) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address([u8; 6]);

impl Address {
    /// Address every interface on the link accepts frames for.
    pub const BROADCAST: Address = Address([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

    /// The all zero placeholder address, carried as the target of an ARP
    /// request.
    pub const NIL: Address = Address([0, 0, 0, 0, 0, 0]);

    /// Creates a MAC address from a network byte order buffer.
    pub fn new(addr: [u8; 6]) -> Address {
        Address(addr)
    }

    /// Creates a MAC address from a network byte order slice.
    pub fn try_from(addr: &[u8]) -> Result<Address> {
        if addr.len() != 6 {
            return Err(Error::Buffer);
        }

        let mut bytes = [0; 6];
        bytes.copy_from_slice(addr);
        Ok(Address(bytes))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Address::BROADCAST
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5],
        )
    }
}

impl std::str::FromStr for Address {
    type Err = ();

    /// Parses a MAC address from an a:b:c:d:e:f style string.
    fn from_str(addr: &str) -> std::result::Result<Address, Self::Err> {
        let mut bytes = [0; 6];
        let mut tokens = addr.split(':');

        for byte in bytes.iter_mut() {
            let token = tokens.next().ok_or(())?;
            *byte = u8::from_str_radix(token, 16).map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(bytes))
    }
}

/// [https://en.wikipedia.org/wiki/EtherType](https://en.wikipedia.org/wiki/EtherType)
pub mod types {
    pub const IPV4: u16 = 0x0800;

    pub const ARP: u16 = 0x0806;
}

mod fields {
    use std;

    pub const DST_ADDR: std::ops::Range<usize> = 0..6;

    pub const SRC_ADDR: std::ops::Range<usize> = 6..12;

    pub const PAYLOAD_TYPE: std::ops::Range<usize> = 12..14;

    pub const PAYLOAD: std::ops::RangeFrom<usize> = 14..;
}

/// Ethernet frame represented as a byte buffer.
#[derive(Debug)]
pub struct Frame<T>
where
    T: AsRef<[u8]>,
{
    buffer: T,
}

impl<T> Frame<T>
where
    T: AsRef<[u8]>,
{
    pub const HEADER_LEN: usize = 14;

    /// Wraps and represents the buffer as an Ethernet frame.
    ///
    /// # Errors
    ///
    /// Causes an error if the buffer is shorter than the frame header.
    pub fn try_new(buffer: T) -> Result<Frame<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            return Err(Error::Buffer);
        }

        Ok(Frame { buffer })
    }

    /// Returns the length of an Ethernet frame with the specified payload
    /// size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    /// Gets the hardware destination address.
    pub fn dst_addr(&self) -> Address {
        Address::try_from(&self.buffer.as_ref()[fields::DST_ADDR]).unwrap()
    }

    /// Gets the hardware source address.
    pub fn src_addr(&self) -> Address {
        Address::try_from(&self.buffer.as_ref()[fields::SRC_ADDR]).unwrap()
    }

    /// Gets the payload type of the frame.
    pub fn payload_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::PAYLOAD_TYPE])
    }

    /// Returns an immutable view of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[fields::PAYLOAD]
    }
}

impl<T> Frame<T>
where
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Sets the hardware destination address.
    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    /// Sets the hardware source address.
    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    /// Sets the payload type.
    pub fn set_payload_type(&mut self, payload_type: u16) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::PAYLOAD_TYPE],
            payload_type,
        );
    }

    /// Returns a mutable view of the payload.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[fields::PAYLOAD]
    }
}

impl<T> AsRef<[u8]> for Frame<T>
where
    T: AsRef<[u8]>,
{
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_with_buffer_less_than_header() {
        let buffer: [u8; 13] = [0; 13];
        assert_matches!(Frame::try_new(&buffer[..]), Err(Error::Buffer));
    }

    #[test]
    fn test_frame_getters_and_setters() {
        let mut buffer: [u8; 16] = [0; 16];

        {
            let mut frame = Frame::try_new(&mut buffer[..]).unwrap();
            frame.set_dst_addr(Address::new([1, 2, 3, 4, 5, 6]));
            frame.set_src_addr(Address::new([7, 8, 9, 10, 11, 12]));
            frame.set_payload_type(types::ARP);
            frame.payload_mut().copy_from_slice(&[0xAB, 0xCD]);
        }

        let frame = Frame::try_new(&buffer[..]).unwrap();
        assert_eq!(frame.dst_addr(), Address::new([1, 2, 3, 4, 5, 6]));
        assert_eq!(frame.src_addr(), Address::new([7, 8, 9, 10, 11, 12]));
        assert_eq!(frame.payload_type(), types::ARP);
        assert_eq!(frame.payload(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_address_display_and_parse() {
        let addr: Address = "ff:ff:ff:ff:ff:ff".parse().unwrap();
        assert!(addr.is_broadcast());
        assert_eq!(format!("{}", Address::new([0, 1, 2, 0xAA, 0xBB, 0xCC])), "00:01:02:aa:bb:cc");
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        assert_matches!("00:01:02:03:04".parse::<Address>(), Err(()));
        assert_matches!("00:01:02:03:04:05:06".parse::<Address>(), Err(()));
        assert_matches!("00:01:02:03:04:zz".parse::<Address>(), Err(()));
    }
}
