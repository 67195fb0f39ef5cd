//! Blocking TCP socket and the transport seam used by the exchange.
//!
//! [`Socket`] owns at most one OS connection and exposes single-attempt
//! `send`/`recv`. Looping over short writes and reads is the caller's job.
//! The descriptor is closed when the socket is dropped, on every path.

use std::io::{self, Read, Write};
use std::net::{SocketAddrV4, TcpStream};

use socket2::{Domain, Protocol, SockAddr, Socket as RawSocket, Type};
use tracing::trace;

use crate::error::SocketError;

/// Byte transport an exchange runs over.
///
/// `send` and `recv` make exactly one attempt each. `Ok(0)` means the peer
/// closed its side; `Err` is a transport failure.
pub trait Transport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// A blocking IPv4 TCP socket that may be connected once.
#[derive(Debug, Default)]
pub struct Socket {
    created: bool,
    stream: Option<TcpStream>,
}

impl Socket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Connect to `addr`. No retry.
    ///
    /// A second call fails with [`SocketError::AlreadyConnected`], also when
    /// the first one allocated a descriptor but failed to connect.
    pub fn connect(&mut self, addr: SocketAddrV4) -> Result<(), SocketError> {
        if self.created {
            return Err(SocketError::AlreadyConnected);
        }
        if addr.port() == 0 {
            return Err(SocketError::InvalidPort);
        }
        let raw = RawSocket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(SocketError::CreateFailed)?;
        self.created = true;
        raw.connect(&SockAddr::from(addr))
            .map_err(SocketError::Connect)?;
        self.stream = Some(TcpStream::from(raw));
        Ok(())
    }

    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))
    }
}

impl Transport for Socket {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stream = self.stream()?;
        loop {
            match stream.write(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                res => {
                    trace!(requested = buf.len(), result = ?res, "send");
                    return res;
                }
            }
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let stream = self.stream()?;
        loop {
            match stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                res => {
                    trace!(max = buf.len(), result = ?res, "recv");
                    return res;
                }
            }
        }
    }
}
