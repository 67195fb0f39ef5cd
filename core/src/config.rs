//! Client tunables.

use serde::{Deserialize, Serialize};

/// Settings shared by every exchange an [`HttpClient`](crate::HttpClient)
/// performs.
///
/// Deserializable with defaults for missing fields, so it can sit inside a
/// caller's own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Destination TCP port.
    pub port: u16,
    /// Upper bound for a single `recv` call. Zero is treated as one.
    pub recv_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: 80,
            recv_chunk_size: 1024,
        }
    }
}

impl ClientConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_recv_chunk_size(mut self, size: usize) -> Self {
        self.recv_chunk_size = size;
        self
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.recv_chunk_size.max(1)
    }
}
