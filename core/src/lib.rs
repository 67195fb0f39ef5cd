//! Minimal blocking HTTP/1.1 client.
//!
//! # Overview
//! Sends one request over a fresh TCP connection and parses the response into
//! protocol, status, content type and body. Only responses carrying an
//! explicit `Content-Length` are understood; there is no TLS, chunked
//! encoding, redirect handling or connection reuse.
//!
//! # Design
//! - `HttpClient` is stateless between calls; every `send` opens and drops
//!   its own connection.
//! - The response receiver is a state machine over an append-only buffer,
//!   independent of how the transport splits the byte stream, so it is tested
//!   against scripted fragmentations without sockets.
//! - Host resolution and connection setup sit behind the `Resolve` and
//!   `Connect` traits.
//! - Every failure is an `ExchangeError` with a stable negative code, which
//!   the C ABI crate passes through unchanged.
//!
//! ```no_run
//! use httpget_core::{Request, send};
//!
//! let response = send(&Request::get("example.com", "/"))?;
//! println!("{} {}", response.protocol, response.status);
//! # Ok::<(), httpget_core::ExchangeError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod parse;
pub mod receiver;
pub mod request;
pub mod resolver;
pub mod socket;

pub use client::{send, send_all, Connect, HttpClient, TcpConnector};
pub use config::ClientConfig;
pub use error::{ExchangeError, ResolveError, SocketError};
pub use http::{Connection, Method, Protocol, Request, Response, DEFAULT_CONTENT_TYPE};
pub use receiver::{receive_response, Phase, ResponseReceiver};
pub use request::encode_request;
pub use resolver::{first_ipv4, Resolve, SystemResolver};
pub use socket::{Socket, Transport};
