//! Error types shared by the codec and the framing layer.

use thiserror::Error;

/// Malformed bytes handed to one of the decoders.
///
/// Every variant is a distinct, recoverable condition: a decoder never
/// substitutes a default value for input it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Buffer is not the size the frame requires.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Directional pad byte outside 0x00..=0x08.
    #[error("invalid directional pad code: {0:#04x}")]
    InvalidDpad(u8),

    /// Byte 7 of a controller packet is not the reserved constant.
    #[error("reserved byte must be 0x00, found {0:#04x}")]
    ReservedByte(u8),

    /// A command needs at least the id byte.
    #[error("empty buffer has no command id")]
    EmptyCommand,

    #[error("crc mismatch: expected {expected:#04x}, found {found:#04x}")]
    CrcMismatch { expected: u8, found: u8 },

    /// Fewer bytes than the record header announces.
    #[error("truncated frame: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Payload does not fit the one-byte length prefix.
    #[error("payload of {0} bytes exceeds the 255 byte record limit")]
    PayloadTooLong(usize),
}

/// Failure pushing bytes through a [`Transport`](crate::network::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short write: sent {sent} of {len} bytes")]
    ShortWrite { sent: usize, len: usize },

    #[error("framing error: {0}")]
    Protocol(#[from] ProtocolError),
}
