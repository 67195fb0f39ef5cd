//! Host name to IPv4 address resolution.

use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

use tracing::debug;

use crate::error::ResolveError;

/// Turns a host name into the single IPv4 address an exchange connects to.
pub trait Resolve {
    fn resolve_ipv4(&self, host: &str) -> Result<Ipv4Addr, ResolveError>;
}

/// Resolver backed by the platform's `getaddrinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve_ipv4(&self, host: &str) -> Result<Ipv4Addr, ResolveError> {
        let addrs = (host, 0)
            .to_socket_addrs()
            .map_err(|source| ResolveError::Lookup {
                host: host.to_string(),
                source,
            })?;
        let ip = first_ipv4(addrs).ok_or_else(|| ResolveError::NoIpv4 {
            host: host.to_string(),
        })?;
        debug!(host, %ip, "resolved");
        Ok(ip)
    }
}

/// First IPv4 address in the order given, skipping IPv6 entries.
pub fn first_ipv4<I>(addrs: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = SocketAddr>,
{
    addrs.into_iter().find_map(|addr| match addr {
        SocketAddr::V4(v4) => Some(*v4.ip()),
        SocketAddr::V6(_) => None,
    })
}
