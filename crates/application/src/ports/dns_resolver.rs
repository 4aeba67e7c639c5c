use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Resolves a domain's `A` records to its public IPv4 addresses.
///
/// Every DNS failure (NXDOMAIN, SERVFAIL, timeout, ...) is recovered
/// locally into an empty result — spec.md §4.4 and §7 treat resolution
/// errors as data, not as a `Result::Err`.
#[async_trait]
pub trait DnsResolverPort: Send + Sync {
    async fn resolve_public_ipv4(&self, domain: &str) -> Vec<Ipv4Addr>;
}
