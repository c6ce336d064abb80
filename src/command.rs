use crate::error::ProtocolError;

/// A discrete message on the control channel: an opaque id byte followed by
/// whatever payload the id implies.
///
/// The frame carries no length. Whoever carved the buffer out of the byte
/// stream decides where it ends; see [`framing`](crate::framing) for the
/// record format the relay channel uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub id: u8,
    pub payload: Vec<u8>,
}

impl Command {
    pub fn new(id: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// A command with an empty payload.
    pub fn bare(id: u8) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.payload.len());
        out.push(self.id);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Everything after the first byte is payload.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        let (&id, payload) = buf.split_first().ok_or(ProtocolError::EmptyCommand)?;
        Ok(Self::new(id, payload))
    }
}
