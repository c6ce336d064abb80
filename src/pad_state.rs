use crate::{
    capture::ButtonProvider,
    constants::{STICK_CENTER, STICK_MAX, STICK_SNAP_TOLERANCE, dpad_codes},
    error::ProtocolError,
};
use byteorder::{BigEndian, ByteOrder};

bitflags::bitflags! {
    /// The 14 digital buttons, one fixed bit each.
    ///
    /// On the wire this is a big-endian `u16`: bits 8..=13 land in the high
    /// byte (MINUS, PLUS, LCLICK, RCLICK, HOME, CAPTURE) and bits 0..=7 in the
    /// low byte (Y, B, A, X, L, R, ZL, ZR). Bits 14 and 15 are never set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonSet: u16 {
        const Y       = 0x0001;
        const B       = 0x0002;
        const A       = 0x0004;
        const X       = 0x0008;
        const L       = 0x0010;
        const R       = 0x0020;
        const ZL      = 0x0040;
        const ZR      = 0x0080;
        const MINUS   = 0x0100;
        const PLUS    = 0x0200;
        const LCLICK  = 0x0400;
        const RCLICK  = 0x0800;
        const HOME    = 0x1000;
        const CAPTURE = 0x2000;
    }
}

impl ButtonSet {
    #[inline]
    #[must_use]
    pub const fn encode(self) -> u16 {
        self.bits()
    }

    /// High byte first.
    #[inline]
    #[must_use]
    pub fn to_bytes(self) -> [u8; 2] {
        let mut out = [0u8; 2];
        BigEndian::write_u16(&mut out, self.encode());
        out
    }

    /// Rebuilds the set from its two wire bytes. Unknown bits are dropped.
    #[inline]
    #[must_use]
    pub fn decode(hi: u8, lo: u8) -> Self {
        Self::from_bits_truncate(BigEndian::read_u16(&[hi, lo]))
    }

    /// Asks the provider about each button once.
    pub fn from_provider<P: ButtonProvider + ?Sized>(provider: &P) -> Self {
        Self::all()
            .iter()
            .filter(|&button| provider.is_button_pressed(button))
            .collect()
    }
}

/// Directional pad as four switches.
///
/// The wire only knows 9 states, so opposite directions cannot both be sent:
/// [`encode`](Self::encode) resolves them with a fixed precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionalPad {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

impl DirectionalPad {
    #[must_use]
    pub const fn new(up: bool, right: bool, down: bool, left: bool) -> Self {
        Self {
            up,
            right,
            down,
            left,
        }
    }

    #[must_use]
    pub const fn center() -> Self {
        Self::new(false, false, false, false)
    }

    /// Precedence is left > right > up > down > center. With left or right
    /// held, up wins over down.
    #[must_use]
    pub const fn encode(self) -> u8 {
        use dpad_codes::*;

        if self.left {
            if self.up {
                UP_LEFT
            } else if self.down {
                DOWN_LEFT
            } else {
                LEFT
            }
        } else if self.right {
            if self.up {
                UP_RIGHT
            } else if self.down {
                DOWN_RIGHT
            } else {
                RIGHT
            }
        } else if self.up {
            UP
        } else if self.down {
            DOWN
        } else {
            CENTER
        }
    }

    pub fn decode(code: u8) -> Result<Self, ProtocolError> {
        use dpad_codes::*;

        let pad = match code {
            UP => Self::new(true, false, false, false),
            UP_RIGHT => Self::new(true, true, false, false),
            RIGHT => Self::new(false, true, false, false),
            DOWN_RIGHT => Self::new(false, true, true, false),
            DOWN => Self::new(false, false, true, false),
            DOWN_LEFT => Self::new(false, false, true, true),
            LEFT => Self::new(false, false, false, true),
            UP_LEFT => Self::new(true, false, false, true),
            CENTER => Self::center(),
            other => return Err(ProtocolError::InvalidDpad(other)),
        };
        Ok(pad)
    }
}

/// One analog stick, each axis normalized to `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalogStick {
    pub x: f32,
    pub y: f32,
}

impl AnalogStick {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn centered() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Quantizes both axes to bytes, snapping near-center values to 0x80.
    ///
    /// # Panics
    ///
    /// If either axis is outside `[-1.0, 1.0]` or NaN. Capture sources must
    /// hand over in-range values.
    #[must_use]
    #[track_caller]
    pub fn encode(self) -> (u8, u8) {
        (encode_axis(self.x), encode_axis(self.y))
    }

    /// Linear inverse of the quantization. The snap is not re-applied; only the
    /// exact center byte maps back to 0.0.
    #[must_use]
    pub fn decode(bx: u8, by: u8) -> Self {
        Self::new(decode_axis(bx), decode_axis(by))
    }
}

#[track_caller]
fn encode_axis(value: f32) -> u8 {
    assert!(
        (-1.0..=1.0).contains(&value),
        "stick axis value {value} outside [-1.0, 1.0]"
    );
    let raw = ((value + 1.0) / 2.0 * STICK_MAX).round() as u8;
    if raw.abs_diff(STICK_CENTER) < STICK_SNAP_TOLERANCE {
        STICK_CENTER
    } else {
        raw
    }
}

#[inline]
fn decode_axis(raw: u8) -> f32 {
    if raw == STICK_CENTER {
        0.0
    } else {
        2.0 * f32::from(raw) / STICK_MAX - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_split_across_bytes() {
        let buttons = ButtonSet::CAPTURE | ButtonSet::MINUS | ButtonSet::ZR | ButtonSet::Y;
        assert_eq!(buttons.encode(), 0x2181);
        assert_eq!(buttons.to_bytes(), [0x21, 0x81]);
        assert_eq!(ButtonSet::decode(0x21, 0x81), buttons);
    }

    #[test]
    fn test_buttons_decode_drops_unknown_bits() {
        let decoded = ButtonSet::decode(0xC0, 0x00);
        assert!(decoded.is_empty());

        let decoded = ButtonSet::decode(0xFF, 0xFF);
        assert_eq!(decoded, ButtonSet::all());
        assert_eq!(decoded.encode(), 0x3FFF);
    }

    #[test]
    fn test_buttons_from_provider() {
        struct Held(ButtonSet);
        impl ButtonProvider for Held {
            fn is_button_pressed(&self, button: ButtonSet) -> bool {
                self.0.contains(button)
            }
        }

        let held = ButtonSet::A | ButtonSet::HOME;
        assert_eq!(ButtonSet::from_provider(&Held(held)), held);
        assert_eq!(ButtonSet::from_provider(&Held(ButtonSet::empty())), ButtonSet::empty());
    }

    #[test]
    fn test_dpad_precedence() {
        use dpad_codes::*;

        let cases = [
            (DirectionalPad::new(true, false, true, true), UP_LEFT),
            (DirectionalPad::new(false, false, true, true), DOWN_LEFT),
            (DirectionalPad::new(false, true, false, true), LEFT),
            (DirectionalPad::new(true, true, true, false), UP_RIGHT),
            (DirectionalPad::new(false, true, true, false), DOWN_RIGHT),
            (DirectionalPad::new(true, false, true, false), UP),
            (DirectionalPad::new(false, false, true, false), DOWN),
            (DirectionalPad::center(), CENTER),
        ];
        for (pad, code) in cases {
            assert_eq!(pad.encode(), code, "{pad:?}");
        }
    }

    #[test]
    fn test_dpad_decode_rejects_unknown_codes() {
        assert_eq!(DirectionalPad::decode(0x09), Err(ProtocolError::InvalidDpad(0x09)));
        assert_eq!(DirectionalPad::decode(0xFF), Err(ProtocolError::InvalidDpad(0xFF)));
    }

    #[test]
    fn test_dpad_codes_round_trip() {
        for code in 0x00..=0x08u8 {
            let pad = DirectionalPad::decode(code).unwrap();
            assert_eq!(pad.encode(), code);
        }
    }

    #[test]
    fn test_stick_extremes_and_center() {
        assert_eq!(AnalogStick::new(-1.0, 1.0).encode(), (0, 255));
        assert_eq!(AnalogStick::centered().encode(), (0x80, 0x80));
        assert_eq!(AnalogStick::decode(0, 255), AnalogStick::new(-1.0, 1.0));
        assert_eq!(AnalogStick::decode(0x80, 0x80), AnalogStick::centered());
    }

    #[test]
    fn test_stick_snap_window() {
        let at = |raw: f32| 2.0 * raw / 255.0 - 1.0;

        // 119 and 137 are the edges of the snap window
        assert_eq!(AnalogStick::new(at(119.0), at(137.0)).encode(), (0x80, 0x80));
        // ten steps away is already outside it
        assert_eq!(AnalogStick::new(at(118.0), at(138.0)).encode(), (118, 138));
        assert_eq!(AnalogStick::new(at(117.0), at(139.0)).encode(), (117, 139));
    }

    #[test]
    fn test_stick_decode_does_not_snap() {
        let stick = AnalogStick::decode(129, 127);
        assert!(stick.x > 0.0);
        assert!(stick.y < 0.0);
    }

    #[test]
    #[should_panic(expected = "outside [-1.0, 1.0]")]
    fn test_stick_out_of_range_panics() {
        let _ = AnalogStick::new(1.5, 0.0).encode();
    }

    #[test]
    #[should_panic(expected = "outside [-1.0, 1.0]")]
    fn test_stick_nan_panics() {
        let _ = AnalogStick::new(0.0, f32::NAN).encode();
    }
}
