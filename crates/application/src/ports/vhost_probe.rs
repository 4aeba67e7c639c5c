use async_trait::async_trait;
use std::net::Ipv4Addr;
use vhost_sieve_domain::{HttpResponse, Service};

/// A transport-level failure while probing a vhost candidate. Counts
/// toward the error streak in the discrimination procedure (spec.md
/// §4.6.1, §7); never carries a status code because none was received.
#[derive(Debug, Clone, thiserror::Error)]
#[error("request failed")]
pub struct ProbeError;

/// A single service's probing session: one persistent connection-reusing
/// client per `(ip, service)` pair (spec.md §4.6.1, §5).
#[async_trait]
pub trait VhostProbeClient: Send + Sync {
    /// Issues the GET described in spec.md §4.6.1 ("Request construction")
    /// for `vhost_name` and returns the canonicalized response.
    async fn get(&self, vhost_name: &str) -> Result<HttpResponse, ProbeError>;
}

/// Builds a [`VhostProbeClient`] for one `(ip, service)` pair, pre-loading
/// the SNI/Host name-injection override for the exact name set this job
/// will probe (spec.md §4.1, §4.6.1 step 1).
#[async_trait]
pub trait VhostProbeClientFactory: Send + Sync {
    async fn build(
        &self,
        ip: Ipv4Addr,
        service: Service,
        injected_names: &[String],
    ) -> Box<dyn VhostProbeClient>;
}
