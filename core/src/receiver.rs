//! Incremental response receiver.
//!
//! # Design
//! [`ResponseReceiver`] is a state machine over an append-only buffer and
//! knows nothing about sockets. It moves through
//! `AwaitingLength → AwaitingSeparator → AwaitingBody → Done`:
//!
//! - `AwaitingLength`: look for `Content-Length: ` and parse the number after
//!   it. A number that touches the end of the buffer is not trusted until a
//!   byte follows it or the peer closes.
//! - `AwaitingSeparator`: look for `\r\n\r\n`.
//! - `AwaitingBody`: wait until the declared number of body bytes is buffered.
//!
//! Each phase re-checks the whole buffer, so it does not matter how the peer's
//! bytes were split across reads. [`receive_response`] drives the machine from
//! a [`Transport`].

use std::io;

use memchr::memmem;
use tracing::{debug, trace};

use crate::error::ExchangeError;
use crate::http::Response;
use crate::parse::{parse_head, parse_leading_int};
use crate::socket::Transport;

const LENGTH_TOKEN: &[u8] = b"Content-Length: ";
const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Where the receiver currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingLength,
    AwaitingSeparator,
    AwaitingBody,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingLength,
    AwaitingSeparator { declared: usize },
    AwaitingBody { declared: usize, body_start: usize },
    Done { declared: usize, body_start: usize },
}

/// Accumulates response bytes and tracks how far parsing has got.
#[derive(Debug)]
pub struct ResponseReceiver {
    buf: Vec<u8>,
    state: State,
    closed: bool,
}

impl Default for ResponseReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseReceiver {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: State::AwaitingLength,
            closed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::AwaitingLength => Phase::AwaitingLength,
            State::AwaitingSeparator { .. } => Phase::AwaitingSeparator,
            State::AwaitingBody { .. } => Phase::AwaitingBody,
            State::Done { .. } => Phase::Done,
        }
    }

    /// Body length announced by the server, once known.
    pub fn declared_length(&self) -> Option<usize> {
        match self.state {
            State::AwaitingLength => None,
            State::AwaitingSeparator { declared }
            | State::AwaitingBody { declared, .. }
            | State::Done { declared, .. } => Some(declared),
        }
    }

    /// Everything received so far.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// How many bytes the next read should ask for.
    ///
    /// While the body is outstanding this never exceeds what is still
    /// missing, so a well-behaved transport never reads past the response.
    pub fn read_limit(&self, chunk_size: usize) -> usize {
        match self.state {
            State::AwaitingBody {
                declared,
                body_start,
            } => chunk_size.min(declared.saturating_sub(self.buf.len() - body_start)),
            _ => chunk_size,
        }
    }

    /// Feed the result of one successful read. An empty `data` is an orderly
    /// close by the peer.
    pub fn feed(&mut self, data: &[u8]) -> Result<Phase, ExchangeError> {
        if data.is_empty() {
            self.closed = true;
        } else {
            self.buf.extend_from_slice(data);
        }
        self.advance()
    }

    /// Map a failed read to the error of the current phase.
    pub fn read_error(&self, err: io::Error) -> ExchangeError {
        match self.state {
            State::AwaitingLength => ExchangeError::RecvLength(err),
            State::AwaitingSeparator { .. } => ExchangeError::RecvSeparator(err),
            State::AwaitingBody { .. } | State::Done { .. } => ExchangeError::RecvBody(err),
        }
    }

    /// Parse the buffered bytes into a [`Response`].
    ///
    /// Called before [`Phase::Done`] is reached, this behaves as if the peer
    /// had closed at this point and reports the matching error.
    pub fn finish(mut self) -> Result<Response, ExchangeError> {
        if self.phase() != Phase::Done {
            self.closed = true;
            self.advance()?;
        }
        let State::Done {
            declared,
            body_start,
        } = self.state
        else {
            return Err(ExchangeError::BodyClosed);
        };

        let head = parse_head(&self.buf[..body_start - SEPARATOR.len()])?;
        self.buf.truncate(body_start + declared);
        let content = self.buf.split_off(body_start);

        Ok(Response {
            protocol: head.protocol,
            status: head.status,
            content_type: head.content_type,
            content_length: declared,
            content,
        })
    }

    fn advance(&mut self) -> Result<Phase, ExchangeError> {
        loop {
            match self.state {
                State::AwaitingLength => {
                    let Some(declared) = self.find_declared_length() else {
                        if self.closed {
                            return Err(ExchangeError::ContentLength);
                        }
                        return Ok(Phase::AwaitingLength);
                    };
                    debug!(declared, "content length found");
                    self.state = State::AwaitingSeparator { declared };
                }
                State::AwaitingSeparator { declared } => {
                    let Some(idx) = memmem::find(&self.buf, SEPARATOR) else {
                        if self.closed {
                            return Err(ExchangeError::HeaderSeparator);
                        }
                        return Ok(Phase::AwaitingSeparator);
                    };
                    let body_start = idx + SEPARATOR.len();
                    debug!(body_start, "header separator found");
                    self.state = State::AwaitingBody {
                        declared,
                        body_start,
                    };
                }
                State::AwaitingBody {
                    declared,
                    body_start,
                } => {
                    let received = self.buf.len() - body_start;
                    trace!(received, declared, "body progress");
                    if received >= declared {
                        self.state = State::Done {
                            declared,
                            body_start,
                        };
                    } else if self.closed {
                        return Err(ExchangeError::BodyClosed);
                    } else {
                        return Ok(Phase::AwaitingBody);
                    }
                }
                State::Done { .. } => return Ok(Phase::Done),
            }
        }
    }

    fn find_declared_length(&self) -> Option<usize> {
        let idx = memmem::find(&self.buf, LENGTH_TOKEN)?;
        parse_leading_int(&self.buf[idx + LENGTH_TOKEN.len()..], self.closed)
    }
}

/// Receive and parse one response from `transport`, reading at most
/// `chunk_size` bytes per call.
pub fn receive_response<T: Transport + ?Sized>(
    transport: &mut T,
    chunk_size: usize,
) -> Result<Response, ExchangeError> {
    let chunk_size = chunk_size.max(1);
    let mut receiver = ResponseReceiver::new();
    let mut chunk = vec![0u8; chunk_size];

    loop {
        let limit = receiver.read_limit(chunk_size);
        let n = transport
            .recv(&mut chunk[..limit])
            .map_err(|e| receiver.read_error(e))?;
        trace!(n, phase = ?receiver.phase(), "received");
        if receiver.feed(&chunk[..n])? == Phase::Done {
            break;
        }
    }

    receiver.finish()
}
