//! Request and response values exchanged with the client.
//!
//! # Design
//! Both types are plain owned data. A `Request` belongs to the caller and is
//! never mutated by an exchange, so the same value can be sent any number of
//! times. A `Response` is built fresh by the receiver and only exists when the
//! exchange succeeded.

use std::borrow::Cow;
use std::fmt;

/// Content type sent with POST bodies when the caller does not pick one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Value of the `Connection` header.
///
/// Advisory only: every exchange opens and closes its own socket whatever
/// this says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connection {
    KeepAlive,
    #[default]
    Close,
}

impl Connection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connection::KeepAlive => "Keep-Alive",
            Connection::Close => "Close",
        }
    }
}

/// A request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub connection: Connection,
    /// Request target. Sent as `/` when empty.
    pub url: String,
    /// Target host, used for both resolution and the `Host` header.
    pub host: String,
    pub user_agent: Option<String>,
    /// Only sent for POST.
    pub content_type: String,
    /// Only sent for POST.
    pub content: Vec<u8>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::Get,
            connection: Connection::Close,
            url: String::new(),
            host: String::new(),
            user_agent: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content: Vec::new(),
        }
    }
}

impl Request {
    pub fn get(host: &str, url: &str) -> Self {
        Self {
            host: host.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn post(host: &str, url: &str, content: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::Post,
            host: host.to_string(),
            url: url.to_string(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// The request target as it goes on the wire.
    pub fn target(&self) -> &str {
        if self.url.is_empty() {
            "/"
        } else {
            &self.url
        }
    }
}

/// Protocol version advertised on the response status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http11,
    Http10,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http11 => "HTTP/1.1",
            Protocol::Http10 => "HTTP/1.0",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully received response.
///
/// `content.len()` always equals `content_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub protocol: Protocol,
    /// Status code as sent. Not range-checked beyond fitting in a `u32`.
    pub status: u32,
    /// Raw `Content-Type` header value, byte for byte, including any leading
    /// whitespace.
    pub content_type: Vec<u8>,
    pub content_length: usize,
    pub content: Vec<u8>,
}

impl Response {
    /// `content_type` as text, with invalid UTF-8 replaced.
    pub fn content_type_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content_type)
    }
}
