use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::info;
use vhost_sieve_domain::config::SampleCap;
use vhost_sieve_domain::{ResolvedDomain, ScannedIp, Service, SieveError};

use crate::ports::{PortProberPort, ProgressSink};
use crate::random_sample::{random_sample, unique};
use crate::worker_pool::run_stage;

/// Stage 2 of the pipeline (spec.md §4.5): scans every resolvable IP for
/// open ports and, on a successful connect, detects HTTP vs HTTPS.
pub struct ScanIpsUseCase {
    prober: Arc<dyn PortProberPort>,
    progress: Arc<dyn ProgressSink>,
    concurrency: usize,
    ports: Vec<u16>,
}

impl ScanIpsUseCase {
    pub fn new(
        prober: Arc<dyn PortProberPort>,
        progress: Arc<dyn ProgressSink>,
        concurrency: usize,
        ports: Vec<u16>,
    ) -> Self {
        Self {
            prober,
            progress,
            concurrency,
            ports,
        }
    }

    pub async fn run(&self, resolved: &[ResolvedDomain], max_ips: SampleCap) -> Vec<ScannedIp> {
        let all_ips: Vec<Ipv4Addr> = resolved
            .iter()
            .filter(|d| !d.is_vhost_candidate())
            .flat_map(|d| d.ips.iter().copied())
            .collect();
        let ips = random_sample(unique(all_ips), max_ips.limit());

        info!("Scanning {} IPs across {} ports...", ips.len(), self.ports.len());
        self.progress.reset(ips.len());

        let prober = Arc::clone(&self.prober);
        let progress = Arc::clone(&self.progress);
        let ports = self.ports.clone();

        run_stage(ips, self.concurrency, move |ip| {
            let prober = Arc::clone(&prober);
            let progress = Arc::clone(&progress);
            let ports = ports.clone();
            async move {
                let mut services = Vec::new();
                for &port in &ports {
                    if let Some(scheme) = prober.probe(ip, port).await {
                        services.push(Service::new(port, scheme));
                    }
                }
                progress.done();
                ScannedIp::new(ip, services)
            }
        })
        .await
    }

    /// Succeeds only if at least one scanned IP exposed at least one live
    /// service (spec.md §4.5).
    pub fn validate(results: &[ScannedIp]) -> Result<(), SieveError> {
        if results.is_empty() {
            Err(SieveError::NoServicesFound)
        } else {
            Ok(())
        }
    }
}
