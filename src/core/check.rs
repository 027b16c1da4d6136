//! Compute internet checksums.

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

/// Calculates the Internet Checksum from [RFC1071](https://tools.ietf.org/html/rfc1071)
/// over a byte slice.
///
/// The bytes are summed as network byte order u16's; an odd trailing byte
/// is padded with zeros on the right.
pub fn internet_checksum(buffer: &[u8]) -> u16 {
    let mut acc: u32 = 0;
    let mut chunks = buffer.chunks_exact(2);

    for chunk in &mut chunks {
        acc += u32::from(NetworkEndian::read_u16(chunk));
    }

    if let Some(&byte) = chunks.remainder().first() {
        acc += u32::from(byte) << 8;
    }

    while acc > 0xFFFF {
        acc = (acc & 0xFFFF) + (acc >> 16);
    }

    !(acc as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_of_empty_buffer() {
        let buffer: [u8; 0] = [];
        assert_eq!(0xFFFF, internet_checksum(&buffer[..]));
    }

    #[test]
    fn test_checksum_of_even_buffer() {
        let buffer: [u8; 8] = [0x00, 0x01, 0xF2, 0x03, 0xF4, 0xF5, 0xF6, 0xF7];
        assert_eq!(0x220D, internet_checksum(&buffer[..]));
    }

    #[test]
    fn test_checksum_pads_odd_buffer() {
        let buffer: [u8; 3] = [0x01, 0x02, 0x03];
        assert_eq!(0xFBFD, internet_checksum(&buffer[..]));
    }

    #[test]
    fn test_checksum_of_valid_header_is_zero() {
        let buffer: [u8; 20] = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xB8, 0x61, 0xC0, 0xA8,
            0x00, 0x01, 0xC0, 0xA8, 0x00, 0xC7,
        ];
        assert_eq!(0, internet_checksum(&buffer[..]));
    }
}
