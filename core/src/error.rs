//! Error types for the exchange and its building blocks.
//!
//! # Design
//! Every way an exchange can fail has its own `ExchangeError` variant, and
//! each variant maps to a fixed negative code through `ExchangeError::code`.
//! Those codes are the observable contract for C callers and must never be
//! renumbered. Transport variants keep the underlying `io::Error` as their
//! source.

use std::io;

use thiserror::Error;

use crate::http::Protocol;

/// Errors from opening a [`Socket`](crate::socket::Socket).
#[derive(Debug, Error)]
pub enum SocketError {
    /// `connect` was already called on this socket.
    #[error("socket already connected")]
    AlreadyConnected,

    #[error("port 0 is not a valid destination")]
    InvalidPort,

    /// The OS refused to allocate a descriptor.
    #[error("failed to create socket: {0}")]
    CreateFailed(#[source] io::Error),

    /// Refused, unreachable, timed out, ...
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),
}

/// Errors from resolving a host name.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to resolve {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Resolution worked but returned only IPv6 addresses, or nothing.
    #[error("no IPv4 address found for {host}")]
    NoIpv4 { host: String },
}

/// Terminal failure of a single request/response exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("host is empty")]
    EmptyHost,

    #[error("DNS resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("socket connect failed: {0}")]
    Connect(#[from] SocketError),

    #[error("error while sending request: {0}")]
    Send(#[source] io::Error),

    #[error("connection closed while sending request")]
    SendClosed,

    #[error("error while receiving response headers: {0}")]
    RecvLength(#[source] io::Error),

    #[error("Content-Length missing or malformed")]
    ContentLength,

    #[error("connection closed before the end of the response headers")]
    HeaderSeparator,

    #[error("error while receiving response header separator: {0}")]
    RecvSeparator(#[source] io::Error),

    #[error("error while receiving response body: {0}")]
    RecvBody(#[source] io::Error),

    #[error("connection closed before the response body was complete")]
    BodyClosed,

    #[error("failed to parse {0} status code")]
    Status(Protocol),

    #[error("unsupported protocol version in response")]
    UnsupportedProtocol,

    #[error("Content-Type header missing")]
    MissingContentType,
}

impl ExchangeError {
    /// Stable negative code for this failure. Success is `0`.
    pub fn code(&self) -> i32 {
        match self {
            ExchangeError::EmptyHost => -1,
            ExchangeError::Resolve(_) => -2,
            ExchangeError::Connect(_) => -3,
            ExchangeError::Send(_) => -4,
            ExchangeError::SendClosed => -5,
            ExchangeError::RecvLength(_) => -6,
            ExchangeError::ContentLength => -7,
            ExchangeError::HeaderSeparator => -8,
            ExchangeError::RecvSeparator(_) => -9,
            ExchangeError::RecvBody(_) => -10,
            ExchangeError::BodyClosed => -11,
            ExchangeError::Status(Protocol::Http11) => -12,
            ExchangeError::Status(Protocol::Http10) => -13,
            ExchangeError::UnsupportedProtocol => -14,
            ExchangeError::MissingContentType => -15,
        }
    }
}
