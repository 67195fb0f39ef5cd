//! Full exchanges against the scripted mock server over loopback TCP.
//!
//! # Design
//! Each test starts its own `MockServer` on an ephemeral port and points the
//! client at `127.0.0.1` with that port. The server records every request it
//! receives, so the bytes on the wire can be compared with `encode_request`.
//! The last test fetches the same scripted response with `ureq` and checks
//! that both clients agree on status, content type and body.

use httpget_core::{encode_request, ClientConfig, HttpClient, Protocol, Request};
use mock_server::{MockServer, Scenario};

const PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 5\r\n\r\nhello";

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(ClientConfig::default().with_port(server.port()))
}

#[test]
fn get_roundtrip() {
    let server = MockServer::start(Scenario::new(PAGE)).unwrap();
    let req = Request::get("127.0.0.1", "/index.html");

    let response = client_for(&server).send(&req).unwrap();
    assert_eq!(response.protocol, Protocol::Http11);
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, b" text/html");
    assert_eq!(response.content_length, 5);
    assert_eq!(response.content, b"hello");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(&requests[0][..], &encode_request(&req)[..]);
}

#[test]
fn post_body_reaches_server() {
    let server = MockServer::start(Scenario::new(
        "HTTP/1.0 201 Created\r\nContent-Length: 2\r\nContent-Type: application/json\r\n\r\n{}",
    ))
    .unwrap();
    let mut req = Request::post("127.0.0.1", "/items", r#"{"name":"x"}"#);
    req.content_type = "application/json".to_string();
    req.user_agent = Some("httpget-tests".to_string());

    let response = client_for(&server).send(&req).unwrap();
    assert_eq!(response.protocol, Protocol::Http10);
    assert_eq!(response.status, 201);
    assert_eq!(response.content, b"{}");

    let requests = server.requests();
    assert_eq!(&requests[0][..], &encode_request(&req)[..]);
    assert!(requests[0].ends_with(br#"{"name":"x"}"#));
}

#[test]
fn repeated_sends_open_new_connections() {
    let server = MockServer::start(Scenario::new(PAGE)).unwrap();
    let client = client_for(&server);
    let req = Request::get("127.0.0.1", "");

    let first = client.send(&req).unwrap();
    let second = client.send(&req).unwrap();
    assert_eq!(first, second);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with(b"GET / HTTP/1.1\r\n"));
}

#[test]
fn single_byte_fragments_give_same_response() {
    let whole_server = MockServer::start(Scenario::new(PAGE)).unwrap();
    let split_server = MockServer::start(Scenario::new(PAGE).fragmented(1, 1)).unwrap();
    let req = Request::get("127.0.0.1", "/");

    let whole = client_for(&whole_server).send(&req).unwrap();
    let split = client_for(&split_server).send(&req).unwrap();
    assert_eq!(split, whole);
}

#[test]
fn tiny_receive_chunks_give_same_response() {
    let server = MockServer::start(Scenario::new(PAGE)).unwrap();
    let req = Request::get("127.0.0.1", "/");

    let client = HttpClient::new(
        ClientConfig::default()
            .with_port(server.port())
            .with_recv_chunk_size(1),
    );
    let response = client.send(&req).unwrap();
    assert_eq!(response.content, b"hello");
}

#[test]
fn truncated_body_is_minus_eleven() {
    let server = MockServer::start(Scenario::new(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 5\r\n\r\nhel",
    ))
    .unwrap();
    let err = client_for(&server)
        .send(&Request::get("127.0.0.1", "/"))
        .unwrap_err();
    assert_eq!(err.code(), -11);
}

#[test]
fn missing_content_length_is_minus_seven() {
    let server = MockServer::start(Scenario::new(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\nhello",
    ))
    .unwrap();
    let err = client_for(&server)
        .send(&Request::get("127.0.0.1", "/"))
        .unwrap_err();
    assert_eq!(err.code(), -7);
}

#[test]
fn refused_connection_is_minus_three() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpClient::new(ClientConfig::default().with_port(port));
    let err = client.send(&Request::get("127.0.0.1", "/")).unwrap_err();
    assert_eq!(err.code(), -3);
}

#[test]
fn agrees_with_ureq() {
    let server = MockServer::start(Scenario::new(PAGE).fragmented(4, 0)).unwrap();

    let ours = client_for(&server)
        .send(&Request::get("127.0.0.1", "/index.html"))
        .unwrap();

    let url = format!("http://127.0.0.1:{}/index.html", server.port());
    let mut theirs = ureq::get(&url).call().unwrap();
    let content_type = theirs
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let body = theirs.body_mut().read_to_vec().unwrap();

    assert_eq!(ours.status, u32::from(theirs.status().as_u16()));
    assert_eq!(ours.content_type_lossy().trim(), content_type);
    assert_eq!(ours.content, body);
    assert_eq!(server.requests().len(), 2);
}
