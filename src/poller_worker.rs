use crate::{
    capture::CaptureSource,
    command::Command,
    constants::command_ids,
    error::TransportError,
    framing::{encode_checked_packet, encode_command_record},
    network::Transport,
    packet::ControllerPacket,
    stoppable_loop::{LoopError, StoppableLoop},
};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::{
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info, warn};

/// How packets are framed on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMode {
    /// Packet bytes plus CRC, as the MCU and the UDP relay expect.
    #[default]
    Raw,
    /// Packet wrapped in a `PACKET` command record.
    Command,
}

#[derive(Clone, Debug)]
pub struct PollerConfig {
    pub wire_mode: WireMode,
    pub send_interval: Duration,
}

/// Captures, encodes and sends one packet per step.
///
/// Every step sends, changed or not, so the remote always has a fresh frame.
pub struct PollerWorker<S, T> {
    source: S,
    transport: T,
    cfg: PollerConfig,
    last_packet: ControllerPacket,
    failures: u64,
}

impl<S: CaptureSource, T: Transport> PollerWorker<S, T> {
    pub fn new(source: S, transport: T, config: PollerConfig) -> Self {
        PollerWorker {
            source,
            transport,
            cfg: config,
            last_packet: ControllerPacket::neutral(),
            failures: 0,
        }
    }

    pub fn send_packet(&mut self, packet: &ControllerPacket) -> Result<(), TransportError> {
        let bytes = frame_packet(packet, self.cfg.wire_mode)?;
        self.transport.send(&bytes)
    }

    /// Sends `command` as a record. Only meaningful in command mode.
    pub fn send_command(&mut self, command: &Command) -> Result<(), TransportError> {
        let record = encode_command_record(command)?;
        self.transport.send(&record)
    }

    pub fn step(&mut self) {
        self.source.refresh();
        let packet = ControllerPacket::capture(&self.source);
        if packet != self.last_packet {
            debug!(bytes = ?packet.encode(), "controller state changed");
            self.last_packet = packet;
        }

        if let Err(e) = self.send_packet(&packet) {
            self.failures += 1;
            warn!(error = %e, failures = self.failures, "failed to send packet");
        }

        if !self.cfg.send_interval.is_zero() {
            thread::sleep(self.cfg.send_interval);
        }
    }

    /// Steps under `lp` until it is stopped, then sends a neutral packet so
    /// the remote releases everything that was held.
    ///
    /// In command mode the session opens with a `PING` carrying the local
    /// time in milliseconds and closes with a bare `EXIT`.
    pub fn run(&mut self, lp: &StoppableLoop) -> Result<(), LoopError> {
        info!(mode = ?self.cfg.wire_mode, interval = ?self.cfg.send_interval, "poller started");
        let commands = self.cfg.wire_mode == WireMode::Command;
        if commands {
            if let Err(e) = self.send_command(&ping_command(SystemTime::now())) {
                warn!(error = %e, "failed to send ping");
            }
        }

        lp.run(|| self.step())?;

        if let Err(e) = self.send_packet(&ControllerPacket::neutral()) {
            warn!(error = %e, "failed to send neutral packet on shutdown");
        }
        if commands {
            if let Err(e) = self.send_command(&Command::bare(command_ids::EXIT)) {
                warn!(error = %e, "failed to send exit");
            }
        }
        info!(failures = self.failures, "poller finished");
        Ok(())
    }
}

pub fn frame_packet(packet: &ControllerPacket, mode: WireMode) -> Result<Vec<u8>, TransportError> {
    let bytes = match mode {
        WireMode::Raw => encode_checked_packet(packet).to_vec(),
        WireMode::Command => {
            encode_command_record(&Command::new(command_ids::PACKET, packet.encode()))?
        }
    };
    Ok(bytes)
}

fn ping_command(now: SystemTime) -> Command {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut payload = [0u8; 8];
    LittleEndian::write_u64(&mut payload, millis);
    Command::new(command_ids::PING, payload)
}
