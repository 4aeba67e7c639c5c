use async_trait::async_trait;
use vhost_sieve_domain::{HttpResponse, IpVhostFindings, SieveError};

/// Writes the final flat-text result file (spec.md §6).
#[async_trait]
pub trait ResultsSink: Send + Sync {
    async fn save(&self, findings: &[IpVhostFindings]) -> Result<(), SieveError>;
}

/// Dumps the full response of a single positive finding to the logs
/// directory, when `--logs-dir` is set (spec.md §4.6, §6).
///
/// A write failure here is logged and does not fail the finding
/// (spec.md §7), so this port never returns an error.
#[async_trait]
pub trait FindingLogger: Send + Sync {
    async fn log_finding(
        &self,
        ip: std::net::Ipv4Addr,
        port: u16,
        scheme: vhost_sieve_domain::Scheme,
        candidate: &str,
        response: &HttpResponse,
    );
}
