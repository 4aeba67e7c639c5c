use hickory_resolver::TokioAsyncResolver;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// A `reqwest::dns::Resolve` implementation that answers a fixed set of
/// names with a single, caller-chosen IPv4 endpoint and falls through to
/// ordinary system resolution for everything else.
///
/// This is the per-client mechanism behind SNI name injection: built once
/// per `(ip, service)` worker and handed to `ClientBuilder::dns_resolver`,
/// it never needs a shared, worker-keyed table (spec.md §9 "dial-context
/// hook" redesign) because each `NameOverride` belongs to exactly one
/// `reqwest::Client`.
pub struct NameOverride {
    names: Arc<HashSet<Box<str>>>,
    ip: Ipv4Addr,
    fallback: TokioAsyncResolver,
}

impl NameOverride {
    pub fn new(names: impl IntoIterator<Item = String>, ip: Ipv4Addr, fallback: TokioAsyncResolver) -> Self {
        Self {
            names: Arc::new(names.into_iter().map(String::into_boxed_str).collect()),
            ip,
            fallback,
        }
    }
}

impl Resolve for NameOverride {
    fn resolve(&self, name: Name) -> Resolving {
        if self.names.contains(name.as_str()) {
            let addr = SocketAddr::new(IpAddr::V4(self.ip), 0);
            let addrs: Addrs = Box::new(std::iter::once(addr));
            return Box::pin(async move { Ok(addrs) });
        }

        let fallback = self.fallback.clone();
        let host = name.as_str().to_string();
        Box::pin(async move {
            let lookup = fallback.lookup_ip(host).await?;
            let addrs: Addrs = Box::new(lookup.into_iter().map(|ip| SocketAddr::new(ip, 0)));
            Ok(addrs)
        })
    }
}
