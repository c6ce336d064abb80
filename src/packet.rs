//! The 8-byte controller state packet.
//!
//! ```text
//! B[0]: 0,0,CAPTURE,HOME,RCLICK,LCLICK,PLUS,MINUS
//! B[1]: ZR,ZL,R,L,X,A,B,Y
//! B[2]: 0,0,0,0,DPAD
//! B[3]: left stick X    B[4]: left stick Y
//! B[5]: right stick X   B[6]: right stick Y
//! B[7]: reserved, always 0x00
//! ```

use crate::{
    capture::CaptureSource,
    constants::{PACKET_LEN, RESERVED_BYTE},
    error::ProtocolError,
    pad_state::{AnalogStick, ButtonSet, DirectionalPad},
};

/// One controller snapshot together with its wire bytes.
///
/// The bytes are computed once in [`new`](Self::new), so a packet is never
/// observed without a valid encoding. Equality compares the wire bytes: two
/// packets whose sticks quantize to the same bytes are the same packet.
#[derive(Debug, Clone, Copy)]
pub struct ControllerPacket {
    buttons: ButtonSet,
    dpad: DirectionalPad,
    left_stick: AnalogStick,
    right_stick: AnalogStick,
    bytes: [u8; PACKET_LEN],
}

impl ControllerPacket {
    /// # Panics
    ///
    /// If a stick axis is outside `[-1.0, 1.0]`.
    #[track_caller]
    pub fn new(
        buttons: ButtonSet,
        dpad: DirectionalPad,
        left_stick: AnalogStick,
        right_stick: AnalogStick,
    ) -> Self {
        let [hi, lo] = buttons.to_bytes();
        let (lx, ly) = left_stick.encode();
        let (rx, ry) = right_stick.encode();
        let bytes = [hi, lo, dpad.encode(), lx, ly, rx, ry, RESERVED_BYTE];

        Self {
            buttons,
            dpad,
            left_stick,
            right_stick,
            bytes,
        }
    }

    /// Idle frame: nothing pressed, everything centered.
    pub fn neutral() -> Self {
        Self::new(
            ButtonSet::empty(),
            DirectionalPad::center(),
            AnalogStick::centered(),
            AnalogStick::centered(),
        )
    }

    /// Polls the source once for every field.
    pub fn capture<S: CaptureSource + ?Sized>(source: &S) -> Self {
        Self::new(
            ButtonSet::from_provider(source),
            source.dpad(),
            source.left_stick(),
            source.right_stick(),
        )
    }

    #[inline]
    pub fn encode(&self) -> [u8; PACKET_LEN] {
        self.bytes
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        let bytes: &[u8; PACKET_LEN] =
            buf.try_into().map_err(|_| ProtocolError::InvalidLength {
                expected: PACKET_LEN,
                actual: buf.len(),
            })?;

        if bytes[7] != RESERVED_BYTE {
            return Err(ProtocolError::ReservedByte(bytes[7]));
        }

        Ok(Self {
            buttons: ButtonSet::decode(bytes[0], bytes[1]),
            dpad: DirectionalPad::decode(bytes[2])?,
            left_stick: AnalogStick::decode(bytes[3], bytes[4]),
            right_stick: AnalogStick::decode(bytes[5], bytes[6]),
            bytes: *bytes,
        })
    }

    pub fn buttons(&self) -> ButtonSet {
        self.buttons
    }

    pub fn dpad(&self) -> DirectionalPad {
        self.dpad
    }

    pub fn left_stick(&self) -> AnalogStick {
        self.left_stick
    }

    pub fn right_stick(&self) -> AnalogStick {
        self.right_stick
    }
}

impl Default for ControllerPacket {
    fn default() -> Self {
        Self::neutral()
    }
}

impl PartialEq for ControllerPacket {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ControllerPacket {}

impl std::hash::Hash for ControllerPacket {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}
