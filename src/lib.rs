//! Controller state packets and command framing for driving an emulated
//! Switch controller from a host.
//!
//! - [`ControllerPacket`] packs buttons, directional pad and both sticks into
//!   the fixed 8-byte frame the controller firmware consumes.
//! - [`Command`] is the `id` + payload unit of the control channel.
//! - [`framing`] adds the CRC trailer and length-prefixed records the
//!   transports put around those units.
//! - [`StoppableLoop`] drives the capture, encode and send cycle until asked
//!   to stop.
//!
//! ```
//! use switch_pad_link::{AnalogStick, ButtonSet, ControllerPacket, DirectionalPad};
//!
//! let packet = ControllerPacket::new(
//!     ButtonSet::A | ButtonSet::ZR,
//!     DirectionalPad::new(true, false, false, true),
//!     AnalogStick::new(-1.0, 0.0),
//!     AnalogStick::centered(),
//! );
//! assert_eq!(packet.encode(), [0x00, 0x84, 0x07, 0x00, 0x80, 0x80, 0x80, 0x00]);
//! assert_eq!(ControllerPacket::decode(&packet.encode()), Ok(packet));
//! ```

pub mod capture;
pub mod cli_app;
pub mod command;
pub mod config;
pub mod constants;
pub mod crc;
pub mod error;
pub mod framing;
pub mod network;
pub mod packet;
pub mod pad_state;
pub mod poller_worker;
pub mod stoppable_loop;

pub use capture::{ButtonProvider, CaptureSource};
pub use command::Command;
pub use error::{ProtocolError, TransportError};
pub use packet::ControllerPacket;
pub use pad_state::{AnalogStick, ButtonSet, DirectionalPad};
pub use stoppable_loop::{LoopError, LoopState, StopCallback, StoppableLoop};
