//! CRC-8 used by the serial link and the network framing.
//!
//! Same polynomial as avr-libc's `_crc8_ccitt_update` (0x07, init 0, no
//! reflection, no final xor), which the `crc` crate ships as CRC-8/SMBUS.

use crc::{CRC_8_SMBUS, Crc};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

#[inline]
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-by-bit port of the firmware's update loop.
    fn crc8_ccitt_update(old: u8, byte: u8) -> u8 {
        let mut data = old ^ byte;
        for _ in 0..8 {
            data = if data & 0x80 == 0 {
                data << 1
            } else {
                (data << 1) ^ 0x07
            };
        }
        data
    }

    #[test]
    fn test_empty() {
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF4);
    }

    #[test]
    fn test_matches_firmware_update_loop() {
        let packet = [0x00, 0x04, 0x08, 0x80, 0x80, 0x12, 0xFE, 0x00];
        let expected = packet.iter().fold(0u8, |crc, &b| crc8_ccitt_update(crc, b));
        assert_eq!(crc8(&packet), expected);
    }
}
