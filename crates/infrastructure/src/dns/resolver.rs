use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;
use vhost_sieve_application::ports::DnsResolverPort;

/// `A`-record resolution via `hickory-resolver`, using the system
/// `resolv.conf` configuration (spec.md §4.4).
pub struct HickoryDnsResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsResolver {
    /// Builds a resolver from the system's configured nameservers, falling
    /// back to `ResolverConfig::default()` (Google's public resolvers) when
    /// none can be read — e.g. inside minimal containers without a
    /// `resolv.conf`.
    pub fn from_system_config(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;

        let resolver = match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, system_opts)) => {
                opts.attempts = system_opts.attempts;
                TokioAsyncResolver::tokio(config, opts)
            }
            Err(error) => {
                debug!(%error, "falling back to default resolver config");
                TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
            }
        };

        Self { resolver }
    }

    /// A cheap handle to the underlying resolver, for adapters that need
    /// ordinary system resolution as a fallback (e.g. [`crate::http::NameOverride`]).
    pub fn handle(&self) -> TokioAsyncResolver {
        self.resolver.clone()
    }

    fn is_public(ip: &Ipv4Addr) -> bool {
        !(ip.is_private() || ip.is_link_local() || ip.is_loopback() || ip.is_broadcast() || ip.is_unspecified())
    }
}

#[async_trait]
impl DnsResolverPort for HickoryDnsResolver {
    async fn resolve_public_ipv4(&self, domain: &str) -> Vec<Ipv4Addr> {
        match self.resolver.ipv4_lookup(domain).await {
            Ok(lookup) => lookup
                .iter()
                .copied()
                .filter(Self::is_public)
                .collect(),
            Err(error) => {
                debug!(domain, %error, "A-record lookup failed");
                Vec::new()
            }
        }
    }
}
