//! One-shot blocking exchange.
//!
//! # Design
//! `HttpClient` holds only its configuration and the two seams it talks to
//! the outside world through: a [`Resolve`] for host names and a [`Connect`]
//! that opens a [`Transport`]. It carries no state between calls; each
//! `send` validates the request, resolves the host, opens a fresh connection,
//! writes the whole request and then runs the receiver. The connection is
//! dropped on every return path.

use std::net::SocketAddrV4;

use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ExchangeError, SocketError};
use crate::http::{Method, Request, Response};
use crate::receiver::receive_response;
use crate::request::encode_request;
use crate::resolver::{Resolve, SystemResolver};
use crate::socket::{Socket, Transport};

/// Opens the transport for one exchange.
pub trait Connect {
    type Stream: Transport;

    fn connect(&self, addr: SocketAddrV4) -> Result<Self::Stream, SocketError>;
}

/// Connects a new [`Socket`] per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl Connect for TcpConnector {
    type Stream = Socket;

    fn connect(&self, addr: SocketAddrV4) -> Result<Socket, SocketError> {
        let mut socket = Socket::new();
        socket.connect(addr)?;
        Ok(socket)
    }
}

/// Synchronous HTTP/1.1 client performing one connection per request.
#[derive(Debug, Clone, Default)]
pub struct HttpClient<R = SystemResolver, C = TcpConnector> {
    config: ClientConfig,
    resolver: R,
    connector: C,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            resolver: SystemResolver,
            connector: TcpConnector,
        }
    }
}

impl<R: Resolve, C: Connect> HttpClient<R, C> {
    pub fn with_parts(config: ClientConfig, resolver: R, connector: C) -> Self {
        Self {
            config,
            resolver,
            connector,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform one request/response exchange.
    pub fn send(&self, request: &Request) -> Result<Response, ExchangeError> {
        if request.host.is_empty() {
            return Err(ExchangeError::EmptyHost);
        }

        let ip = self.resolver.resolve_ipv4(&request.host)?;
        let payload = encode_request(request);
        debug!(
            head = %String::from_utf8_lossy(&payload[..payload.len() - request_body_len(request)]),
            "request"
        );

        let addr = SocketAddrV4::new(ip, self.config.port);
        let mut stream = self.connector.connect(addr)?;
        debug!(%addr, "connected");

        send_all(&mut stream, &payload)?;
        let response = receive_response(&mut stream, self.config.chunk_size())?;
        debug!(
            status = response.status,
            content_length = response.content_length,
            "response received"
        );
        Ok(response)
    }
}

/// Send a request with the default client: system resolver, port 80,
/// 1024-byte reads.
pub fn send(request: &Request) -> Result<Response, ExchangeError> {
    HttpClient::new(ClientConfig::default()).send(request)
}

/// Write all of `payload`, looping over short writes.
pub fn send_all<T: Transport + ?Sized>(
    transport: &mut T,
    payload: &[u8],
) -> Result<(), ExchangeError> {
    let mut done = 0;
    while done < payload.len() {
        let n = transport
            .send(&payload[done..])
            .map_err(ExchangeError::Send)?;
        trace!(done, total = payload.len(), n, "send loop");
        if n == 0 {
            return Err(ExchangeError::SendClosed);
        }
        done += n;
    }
    Ok(())
}

fn request_body_len(request: &Request) -> usize {
    match request.method {
        Method::Post => request.content.len(),
        Method::Get => 0,
    }
}
