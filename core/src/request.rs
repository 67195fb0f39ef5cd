//! Request serialization.
//!
//! The header set and its order are fixed: request line, `Host`, optional
//! `User-Agent`, `Connection`, then `Content-Type` and `Content-Length` for
//! POST. Nothing else is ever emitted.

use crate::http::{Method, Request};

/// Build the exact bytes sent on the wire for `request`.
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut head = String::with_capacity(128);

    head.push_str(request.method.as_str());
    head.push(' ');
    head.push_str(request.target());
    head.push_str(" HTTP/1.1\r\n");

    head.push_str("Host: ");
    head.push_str(&request.host);
    head.push_str("\r\n");

    if let Some(user_agent) = request.user_agent.as_deref().filter(|ua| !ua.is_empty()) {
        head.push_str("User-Agent: ");
        head.push_str(user_agent);
        head.push_str("\r\n");
    }

    head.push_str("Connection: ");
    head.push_str(request.connection.as_str());
    head.push_str("\r\n");

    match request.method {
        Method::Post => {
            head.push_str("Content-Type: ");
            head.push_str(&request.content_type);
            head.push_str("\r\nContent-Length: ");
            head.push_str(&request.content.len().to_string());
            head.push_str("\r\n\r\n");

            let mut bytes = head.into_bytes();
            bytes.extend_from_slice(&request.content);
            bytes
        }
        Method::Get => {
            head.push_str("\r\n");
            head.into_bytes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Connection;

    #[test]
    fn get_with_defaults() {
        let req = Request::get("example.com", "/index.html");
        assert_eq!(
            encode_request(&req),
            b"GET /index.html HTTP/1.1\r\nHost: example.com\r\nConnection: Close\r\n\r\n"
        );
    }

    #[test]
    fn empty_url_becomes_root() {
        let req = Request::get("example.com", "");
        let bytes = encode_request(&req);
        assert!(bytes.starts_with(b"GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn user_agent_and_keep_alive() {
        let req = Request {
            connection: Connection::KeepAlive,
            user_agent: Some("httpget/0.1".to_string()),
            ..Request::get("example.com", "/")
        };
        assert_eq!(
            encode_request(&req),
            b"GET / HTTP/1.1\r\nHost: example.com\r\nUser-Agent: httpget/0.1\r\nConnection: Keep-Alive\r\n\r\n"
        );
    }

    #[test]
    fn empty_user_agent_is_omitted() {
        let req = Request {
            user_agent: Some(String::new()),
            ..Request::get("example.com", "/")
        };
        let text = String::from_utf8(encode_request(&req)).unwrap();
        assert!(!text.contains("User-Agent"));
    }

    #[test]
    fn post_appends_body_verbatim() {
        let req = Request::post("example.com", "/form", b"a=1&b=\x00\xff".to_vec());
        let mut expected = b"POST /form HTTP/1.1\r\nHost: example.com\r\nConnection: Close\r\n\
Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 8\r\n\r\n"
            .to_vec();
        expected.extend_from_slice(b"a=1&b=\x00\xff");
        assert_eq!(encode_request(&req), expected);
    }

    #[test]
    fn get_ignores_body_and_content_type() {
        let req = Request {
            content_type: "text/plain".to_string(),
            content: b"ignored".to_vec(),
            ..Request::get("example.com", "/")
        };
        let text = String::from_utf8(encode_request(&req)).unwrap();
        assert!(!text.contains("Content-Type"));
        assert!(!text.contains("ignored"));
        assert!(text.ends_with("\r\n\r\n"));
    }
}
