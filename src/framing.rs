//! Integrity framing the transports wrap around packets and commands.
//!
//! Two formats are in use:
//!
//! - **Checked packet**: the 8 packet bytes followed by their CRC-8. Sent as
//!   one UDP datagram, and the format the controller MCU expects on its UART.
//! - **Command record**: `[len][id][payload; len][crc]`, where `crc` covers the
//!   payload only. Used on stream channels where records must be delimited.

use crate::{
    command::Command,
    constants::{MAX_RECORD_PAYLOAD, PACKET_LEN, RECORD_OVERHEAD},
    crc::crc8,
    error::{ProtocolError, TransportError},
    packet::ControllerPacket,
};
use byteorder::ReadBytesExt;
use std::io::Read;

pub const CHECKED_PACKET_LEN: usize = PACKET_LEN + 1;

pub fn encode_checked_packet(packet: &ControllerPacket) -> [u8; CHECKED_PACKET_LEN] {
    let mut out = [0u8; CHECKED_PACKET_LEN];
    out[..PACKET_LEN].copy_from_slice(packet.as_bytes());
    out[PACKET_LEN] = crc8(packet.as_bytes());
    out
}

pub fn decode_checked_packet(buf: &[u8]) -> Result<ControllerPacket, ProtocolError> {
    if buf.len() != CHECKED_PACKET_LEN {
        return Err(ProtocolError::InvalidLength {
            expected: CHECKED_PACKET_LEN,
            actual: buf.len(),
        });
    }
    let (body, trailer) = buf.split_at(PACKET_LEN);
    check_crc(body, trailer[0])?;
    ControllerPacket::decode(body)
}

pub fn encode_command_record(command: &Command) -> Result<Vec<u8>, ProtocolError> {
    let len = command.payload.len();
    if len > MAX_RECORD_PAYLOAD {
        return Err(ProtocolError::PayloadTooLong(len));
    }

    let mut out = Vec::with_capacity(RECORD_OVERHEAD + len);
    out.push(len as u8);
    out.push(command.id);
    out.extend_from_slice(&command.payload);
    out.push(crc8(&command.payload));
    Ok(out)
}

/// Decodes the record at the front of `buf`.
///
/// Returns the command and how many bytes it occupied; trailing bytes belong
/// to the next record.
pub fn decode_command_record(buf: &[u8]) -> Result<(Command, usize), ProtocolError> {
    let Some(&len) = buf.first() else {
        return Err(ProtocolError::Truncated {
            needed: RECORD_OVERHEAD,
            available: 0,
        });
    };
    let len = usize::from(len);
    let needed = RECORD_OVERHEAD + len;
    if buf.len() < needed {
        return Err(ProtocolError::Truncated {
            needed,
            available: buf.len(),
        });
    }

    let payload = &buf[2..2 + len];
    check_crc(payload, buf[2 + len])?;
    Ok((Command::new(buf[1], payload), needed))
}

/// Blocks until one full record has been read from `reader`.
pub fn read_command_record<R: Read>(reader: &mut R) -> Result<Command, TransportError> {
    let len = reader.read_u8()?;
    let id = reader.read_u8()?;
    let mut payload = vec![0u8; usize::from(len)];
    reader.read_exact(&mut payload)?;
    let found = reader.read_u8()?;
    check_crc(&payload, found)?;
    Ok(Command::new(id, payload))
}

fn check_crc(data: &[u8], found: u8) -> Result<(), ProtocolError> {
    let expected = crc8(data);
    if expected == found {
        Ok(())
    } else {
        Err(ProtocolError::CrcMismatch { expected, found })
    }
}
