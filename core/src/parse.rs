//! Field extraction from a complete response header block.
//!
//! Matching is literal and case-sensitive: the status line token is located
//! anywhere in the header region, and the `Content-Type` value is the raw
//! byte slice after the colon, leading whitespace included. Header values are
//! not required to be UTF-8.

use memchr::memmem;

use crate::error::ExchangeError;
use crate::http::Protocol;

const CONTENT_TYPE: &[u8] = b"Content-Type:";
const CRLF: &[u8] = b"\r\n";

/// Fields pulled out of the header region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub protocol: Protocol,
    pub status: u32,
    pub content_type: Vec<u8>,
}

/// Parse the header region, i.e. every byte before the `\r\n\r\n` separator.
pub fn parse_head(head: &[u8]) -> Result<Head, ExchangeError> {
    let (protocol, rest) = [Protocol::Http11, Protocol::Http10]
        .into_iter()
        .find_map(|protocol| {
            let token = protocol.as_str().as_bytes();
            memmem::find(head, token).map(|idx| (protocol, &head[idx + token.len()..]))
        })
        .ok_or(ExchangeError::UnsupportedProtocol)?;

    // one separating character sits between the version and the code
    let status = rest
        .get(1..)
        .and_then(|digits| parse_leading_int(digits, true))
        .and_then(|value| u32::try_from(value).ok())
        .ok_or(ExchangeError::Status(protocol))?;

    let idx = memmem::find(head, CONTENT_TYPE).ok_or(ExchangeError::MissingContentType)?;
    let value = &head[idx + CONTENT_TYPE.len()..];
    let end = memmem::find(value, CRLF).unwrap_or(value.len());
    let content_type = value[..end].to_vec();

    Ok(Head {
        protocol,
        status,
        content_type,
    })
}

/// Parse the unsigned integer at the start of `bytes`, after optional spaces
/// and tabs.
///
/// With `terminated == false` the digits must be followed by some other byte,
/// because a number running into the end of the buffer may still be growing.
pub(crate) fn parse_leading_int(bytes: &[u8], terminated: bool) -> Option<usize> {
    let start = bytes.iter().position(|b| !matches!(b, b' ' | b'\t'))?;
    let rest = &bytes[start..];
    let len = rest
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if len == 0 || (len == rest.len() && !terminated) {
        return None;
    }
    rest[..len].iter().try_fold(0usize, |acc, b| {
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http11_head() {
        let head = parse_head(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 5").unwrap();
        assert_eq!(head.protocol, Protocol::Http11);
        assert_eq!(head.status, 200);
        assert_eq!(head.content_type, b" text/html");
    }

    #[test]
    fn http10_head() {
        let head = parse_head(b"HTTP/1.0 404 Not Found\r\nContent-Type:text/plain\r\nContent-Length: 0").unwrap();
        assert_eq!(head.protocol, Protocol::Http10);
        assert_eq!(head.status, 404);
        assert_eq!(head.content_type, b"text/plain");
    }

    #[test]
    fn content_type_as_last_header_runs_to_end() {
        let head = parse_head(b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nContent-Type:  a/b ").unwrap();
        assert_eq!(head.content_type, b"  a/b ");
    }

    #[test]
    fn unknown_protocol() {
        let err = parse_head(b"HTTP/2 200\r\nContent-Type: x").unwrap_err();
        assert_eq!(err.code(), -14);
        let err = parse_head(b"ICY 200 OK\r\nContent-Type: x").unwrap_err();
        assert_eq!(err.code(), -14);
    }

    #[test]
    fn bad_status_is_version_specific() {
        let err = parse_head(b"HTTP/1.1 abc\r\nContent-Type: x").unwrap_err();
        assert_eq!(err.code(), -12);
        let err = parse_head(b"HTTP/1.0 OK\r\nContent-Type: x").unwrap_err();
        assert_eq!(err.code(), -13);
        let err = parse_head(b"HTTP/1.1").unwrap_err();
        assert_eq!(err.code(), -12);
        let err = parse_head(b"HTTP/1.1 99999999999\r\nContent-Type: x").unwrap_err();
        assert_eq!(err.code(), -12);
    }

    #[test]
    fn status_is_not_limited_to_three_digits() {
        let head = parse_head(b"HTTP/1.1 1000 Odd\r\nContent-Type: x").unwrap();
        assert_eq!(head.status, 1000);
        let head = parse_head(b"HTTP/1.0 99999\r\nContent-Type: x").unwrap();
        assert_eq!(head.status, 99999);
    }

    #[test]
    fn content_type_keeps_non_utf8_bytes() {
        let head = parse_head(b"HTTP/1.1 200 OK\r\nContent-Type: a\xe9\x00b\r\nX: y").unwrap();
        assert_eq!(head.content_type, b" a\xe9\x00b");
    }

    #[test]
    fn http11_preferred_over_http10() {
        let head = parse_head(b"HTTP/1.0 500 x\r\nVia: HTTP/1.1 201\r\nContent-Type: x").unwrap();
        assert_eq!(head.protocol, Protocol::Http11);
        assert_eq!(head.status, 201);
    }

    #[test]
    fn missing_content_type() {
        let err = parse_head(b"HTTP/1.1 200 OK\r\nContent-Length: 0").unwrap_err();
        assert_eq!(err.code(), -15);
        // header names are matched case-sensitively
        let err = parse_head(b"HTTP/1.1 200 OK\r\ncontent-type: text/html").unwrap_err();
        assert_eq!(err.code(), -15);
    }

    #[test]
    fn leading_int() {
        assert_eq!(parse_leading_int(b"42\r\n", false), Some(42));
        assert_eq!(parse_leading_int(b"  7 ", false), Some(7));
        assert_eq!(parse_leading_int(b"42", false), None);
        assert_eq!(parse_leading_int(b"42", true), Some(42));
        assert_eq!(parse_leading_int(b"   ", true), None);
        assert_eq!(parse_leading_int(b"-1\r\n", true), None);
        assert_eq!(parse_leading_int(b"x1", true), None);
        assert_eq!(parse_leading_int(b"99999999999999999999999\r\n", true), None);
    }
}
