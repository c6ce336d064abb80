use crate::error::TransportError;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{debug, trace};

/// Byte sink on the way to the remote endpoint.
pub trait Transport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// Sends each buffer as one UDP datagram.
pub struct UdpTransport {
    sock: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    pub fn new(target: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let target = resolve(target)?;
        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let sock = UdpSocket::bind(bind_addr)?;
        debug!(local = ?sock.local_addr().ok(), %target, "udp transport ready");

        Ok(Self { sock, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let sent = self.sock.send_to(bytes, self.target)?;
        if sent != bytes.len() {
            return Err(TransportError::ShortWrite {
                sent,
                len: bytes.len(),
            });
        }
        trace!(target = %self.target, ?bytes, "sent datagram");
        Ok(())
    }
}

fn resolve(target: impl ToSocketAddrs) -> Result<SocketAddr, TransportError> {
    target.to_socket_addrs()?.next().ok_or_else(|| {
        TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "target address did not resolve",
        ))
    })
}
