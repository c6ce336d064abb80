// Network
pub const DEFAULT_PORT: u16 = 32800;

// Packet layout
pub const PACKET_LEN: usize = 8;
pub const RESERVED_BYTE: u8 = 0x00;

// Stick encoding
pub const STICK_CENTER: u8 = 0x80;
pub const STICK_MAX: f32 = 255.0;
/// Raw bytes strictly closer than this to `STICK_CENTER` are snapped to it.
pub const STICK_SNAP_TOLERANCE: u8 = 10;

// Directional pad wire codes, clockwise from north
pub mod dpad_codes {
    pub const UP: u8 = 0x00;
    pub const UP_RIGHT: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const DOWN_RIGHT: u8 = 0x03;
    pub const DOWN: u8 = 0x04;
    pub const DOWN_LEFT: u8 = 0x05;
    pub const LEFT: u8 = 0x06;
    pub const UP_LEFT: u8 = 0x07;
    pub const CENTER: u8 = 0x08;
}

// Command ids the bundled sender knows about; everything else is opaque
pub mod command_ids {
    pub const PACKET: u8 = 0x00;
    pub const PING: u8 = 0x45;
    pub const EXIT: u8 = 0xFF;
}

// Command record: [len][id][payload][crc]
pub const MAX_RECORD_PAYLOAD: usize = u8::MAX as usize;
pub const RECORD_OVERHEAD: usize = 3;
