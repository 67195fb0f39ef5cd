use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::RwLock,
};

/// What the server sends back on every connection.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scenario {
    /// Raw response bytes, written verbatim.
    pub response: String,
    /// Write the response in pieces of this many bytes.
    #[serde(default)]
    pub fragment: Option<usize>,
    /// Pause between pieces.
    #[serde(default)]
    pub delay_ms: u64,
}

impl Scenario {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    pub fn fragmented(mut self, size: usize, delay_ms: u64) -> Self {
        self.fragment = Some(size);
        self.delay_ms = delay_ms;
        self
    }
}

/// Raw requests received so far, in arrival order.
pub type RequestLog = Arc<RwLock<Vec<Bytes>>>;

/// Accept connections forever, replaying `scenario` on each.
pub async fn run(listener: TcpListener, scenario: Scenario, log: RequestLog) -> Result<(), io::Error> {
    let scenario = Arc::new(scenario);
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::info!(%peer, "accepted connection");

        let scenario = Arc::clone(&scenario);
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            if let Err(e) = serve(stream, &scenario, &log).await {
                tracing::warn!(%peer, error = %e, "connection error");
            }
        });
    }
}

async fn serve(mut stream: TcpStream, scenario: &Scenario, log: &RequestLog) -> Result<(), io::Error> {
    stream.set_nodelay(true)?;
    let request = read_request(&mut stream).await?;
    log.write().await.push(request);

    let response = scenario.response.as_bytes();
    let step = scenario.fragment.unwrap_or(response.len()).max(1);
    for piece in response.chunks(step) {
        stream.write_all(piece).await?;
        stream.flush().await?;
        if scenario.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(scenario.delay_ms)).await;
        }
    }
    stream.shutdown().await
}

/// Read one request head plus a `Content-Length` body, if any.
async fn read_request(stream: &mut TcpStream) -> Result<Bytes, io::Error> {
    let mut buf = BytesMut::with_capacity(1024);
    let head_end = loop {
        if let Some(idx) = find(&buf, b"\r\n\r\n") {
            break idx + 4;
        }
        if stream.read_buf(&mut buf).await? == 0 {
            return Ok(buf.freeze());
        }
    };

    let total = head_end + content_length(&buf[..head_end]);
    while buf.len() < total {
        if stream.read_buf(&mut buf).await? == 0 {
            break;
        }
    }
    Ok(buf.freeze())
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn serve_blocking(
    std_listener: std::net::TcpListener,
    scenario: Scenario,
    log: RequestLog,
) -> Result<(), io::Error> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        let listener = TcpListener::from_std(std_listener)?;
        run(listener, scenario, log).await
    })
}

/// A scripted server running on its own thread, for use from blocking tests.
pub struct MockServer {
    addr: SocketAddr,
    log: RequestLog,
}

impl MockServer {
    /// Bind to an ephemeral loopback port and start serving `scenario`.
    pub fn start(scenario: Scenario) -> Result<Self, io::Error> {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = std_listener.local_addr()?;
        std_listener.set_nonblocking(true)?;

        let log = RequestLog::default();
        let server_log = Arc::clone(&log);
        std::thread::spawn(move || {
            if let Err(e) = serve_blocking(std_listener, scenario, server_log) {
                tracing::error!(%addr, error = %e, "mock server stopped");
            }
        });

        Ok(Self { addr, log })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Requests received so far. Must not be called from async code.
    pub fn requests(&self) -> Vec<Bytes> {
        self.log.blocking_read().clone()
    }
}
