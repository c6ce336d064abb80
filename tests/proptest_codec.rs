//! Property tests for the packet codec, the command frame and the CRC framing.

use proptest::prelude::*;
use switch_pad_link::{
    AnalogStick, ButtonSet, Command, ControllerPacket, DirectionalPad, ProtocolError,
    constants::{STICK_CENTER, STICK_SNAP_TOLERANCE},
    framing::{
        decode_checked_packet, decode_command_record, encode_checked_packet,
        encode_command_record,
    },
};

const STEP: f32 = 1.0 / 255.0;

fn buttons() -> impl Strategy<Value = ButtonSet> {
    (0u16..=0x3FFF).prop_map(ButtonSet::from_bits_truncate)
}

fn dpad() -> impl Strategy<Value = DirectionalPad> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
        .prop_map(|(up, right, down, left)| DirectionalPad::new(up, right, down, left))
}

fn stick() -> impl Strategy<Value = AnalogStick> {
    (-1.0f32..=1.0, -1.0f32..=1.0).prop_map(|(x, y)| AnalogStick::new(x, y))
}

fn raw_axis(value: f32) -> u8 {
    ((value + 1.0) / 2.0 * 255.0).round() as u8
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_buttons_round_trip(b in buttons()) {
        let [hi, lo] = b.to_bytes();
        prop_assert_eq!(ButtonSet::decode(hi, lo), b);
        prop_assert_eq!(hi & 0xC0, 0, "bits 14 and 15 must stay clear");
    }

    #[test]
    fn prop_buttons_decode_ignores_high_bits(hi in any::<u8>(), lo in any::<u8>()) {
        let decoded = ButtonSet::decode(hi, lo);
        prop_assert_eq!(decoded.encode(), u16::from_be_bytes([hi, lo]) & 0x3FFF);
    }

    #[test]
    fn prop_dpad_invalid_codes_rejected(code in 0x09u8..=0xFF) {
        prop_assert_eq!(DirectionalPad::decode(code), Err(ProtocolError::InvalidDpad(code)));
    }

    #[test]
    fn prop_dpad_encode_is_valid_code(pad in dpad()) {
        let code = pad.encode();
        prop_assert!(code <= 0x08);
        let canonical = DirectionalPad::decode(code).unwrap();
        prop_assert_eq!(canonical.encode(), code);
    }

    #[test]
    fn prop_dpad_left_beats_right(up in any::<bool>(), down in any::<bool>()) {
        let with_both = DirectionalPad::new(up, true, down, true);
        let left_only = DirectionalPad::new(up, false, down, true);
        prop_assert_eq!(with_both.encode(), left_only.encode());
    }

    #[test]
    fn prop_stick_quantization(s in stick()) {
        let (bx, by) = s.encode();
        let decoded = AnalogStick::decode(bx, by);

        for (value, byte, back) in [(s.x, bx, decoded.x), (s.y, by, decoded.y)] {
            if raw_axis(value).abs_diff(STICK_CENTER) < STICK_SNAP_TOLERANCE {
                prop_assert_eq!(byte, STICK_CENTER);
                prop_assert_eq!(back, 0.0);
            } else {
                prop_assert!(
                    (back - value).abs() <= STEP + 1e-6,
                    "{} decoded as {}", value, back
                );
            }
        }
    }

    #[test]
    fn prop_stick_reencode_is_stable(bx in any::<u8>(), by in any::<u8>()) {
        // Bytes a sender can produce never fall inside the snap window.
        prop_assume!(bx == STICK_CENTER || bx.abs_diff(STICK_CENTER) >= STICK_SNAP_TOLERANCE);
        prop_assume!(by == STICK_CENTER || by.abs_diff(STICK_CENTER) >= STICK_SNAP_TOLERANCE);
        prop_assert_eq!(AnalogStick::decode(bx, by).encode(), (bx, by));
    }

    #[test]
    fn prop_packet_round_trip(b in buttons(), d in dpad(), l in stick(), r in stick()) {
        let packet = ControllerPacket::new(b, d, l, r);
        let bytes = packet.encode();
        prop_assert_eq!(bytes[7], 0x00);
        prop_assert_eq!(ControllerPacket::decode(&bytes), Ok(packet));
    }

    #[test]
    fn prop_packet_rejects_wrong_length(buf in proptest::collection::vec(any::<u8>(), 0..32)) {
        prop_assume!(buf.len() != 8);
        prop_assert_eq!(
            ControllerPacket::decode(&buf),
            Err(ProtocolError::InvalidLength { expected: 8, actual: buf.len() })
        );
    }

    #[test]
    fn prop_packet_rejects_reserved(reserved in 1u8..=0xFF) {
        let mut bytes = ControllerPacket::neutral().encode();
        bytes[7] = reserved;
        prop_assert_eq!(ControllerPacket::decode(&bytes), Err(ProtocolError::ReservedByte(reserved)));
    }

    #[test]
    fn prop_command_round_trip(id in any::<u8>(), payload in proptest::collection::vec(any::<u8>(), 0..64)) {
        let command = Command::new(id, payload);
        prop_assert_eq!(Command::decode(&command.encode()), Ok(command));
    }

    #[test]
    fn prop_command_record_round_trip(id in any::<u8>(), payload in proptest::collection::vec(any::<u8>(), 0..=255)) {
        let command = Command::new(id, payload);
        let record = encode_command_record(&command).unwrap();
        prop_assert_eq!(record.len(), command.payload.len() + 3);
        prop_assert_eq!(decode_command_record(&record), Ok((command, record.len())));
    }

    #[test]
    fn prop_checked_packet_detects_single_bit_flip(
        b in buttons(), l in stick(), idx in 0usize..9, bit in 0u8..8
    ) {
        let packet = ControllerPacket::new(b, DirectionalPad::center(), l, AnalogStick::centered());
        let mut framed = encode_checked_packet(&packet);
        prop_assert_eq!(decode_checked_packet(&framed), Ok(packet));

        framed[idx] ^= 1 << bit;
        let is_crc_error = matches!(
            decode_checked_packet(&framed),
            Err(ProtocolError::CrcMismatch { .. })
        );
        prop_assert!(is_crc_error);
    }
}

#[test]
fn neutral_packet_literal() {
    assert_eq!(
        ControllerPacket::neutral().encode(),
        [0x00, 0x00, 0x08, 0x80, 0x80, 0x80, 0x80, 0x00]
    );
    assert_eq!(ControllerPacket::default(), ControllerPacket::neutral());
}

#[test]
fn command_literal_round_trip() {
    let command = Command::new(0x05, vec![1u8, 2, 3]);
    assert_eq!(Command::decode(&command.encode()), Ok(Command::new(0x05, vec![1u8, 2, 3])));
}

#[test]
fn dpad_left_up_down_is_up_left() {
    assert_eq!(DirectionalPad::new(true, false, true, true).encode(), 0x07);
}

#[test]
fn all_dpad_codes_round_trip() {
    for code in 0x00..=0x08u8 {
        assert_eq!(DirectionalPad::decode(code).map(DirectionalPad::encode), Ok(code));
    }
}
