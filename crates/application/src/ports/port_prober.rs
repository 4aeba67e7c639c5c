use async_trait::async_trait;
use std::net::Ipv4Addr;
use vhost_sieve_domain::Scheme;

/// Attempts a TCP connect to `(ip, port)` and, on success, scheme detection
/// (spec.md §4.5). Returns `None` when the port did not accept a
/// connection or no scheme could be detected.
#[async_trait]
pub trait PortProberPort: Send + Sync {
    async fn probe(&self, ip: Ipv4Addr, port: u16) -> Option<Scheme>;
}
