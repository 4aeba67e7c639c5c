use tracing::{error, info};
use vhost_sieve_domain::config::SampleCap;
use vhost_sieve_domain::{ResolvedDomain, SieveError};

use super::{FindVhostsUseCase, ResolveDomainsUseCase, ScanIpsUseCase};
use crate::ports::ResultsSink;
use std::sync::Arc;

/// What the driver did, for the CLI layer to report and decide the exit
/// path on (spec.md §4.8, §7 "pipeline emptiness").
pub enum PipelineOutcome {
    /// Results were written; carries the number of `(ip, service)` lines.
    Saved { vhosts_found: usize },
    /// A stage validation failed before any scanning/probing that would
    /// depend on it — diagnostic already logged, nothing written.
    Empty,
}

/// Sequences the three stages (spec.md §4.8), enforcing the strict
/// happens-before between them and writing results only once all three
/// have completed.
pub struct PipelineUseCase {
    resolve_domains: ResolveDomainsUseCase,
    scan_ips: ScanIpsUseCase,
    find_vhosts: FindVhostsUseCase,
    results_sink: Arc<dyn ResultsSink>,
    max_vhost_candidates: SampleCap,
}

impl PipelineUseCase {
    pub fn new(
        resolve_domains: ResolveDomainsUseCase,
        scan_ips: ScanIpsUseCase,
        find_vhosts: FindVhostsUseCase,
        results_sink: Arc<dyn ResultsSink>,
        max_vhost_candidates: SampleCap,
    ) -> Self {
        Self {
            resolve_domains,
            scan_ips,
            find_vhosts,
            results_sink,
            max_vhost_candidates,
        }
    }

    pub async fn run(
        &self,
        raw_domains: Vec<String>,
        max_domains: SampleCap,
        max_ips: SampleCap,
    ) -> Result<PipelineOutcome, SieveError> {
        let resolved = self.resolve_domains.run(raw_domains, max_domains).await;
        if let Err(err) = ResolveDomainsUseCase::validate(&resolved) {
            error!(%err, "stage 1 produced nothing to scan");
            return Ok(PipelineOutcome::Empty);
        }

        info!("");
        let scanned = self.scan_ips.run(&resolved, max_ips).await;
        if let Err(err) = ScanIpsUseCase::validate(&scanned) {
            error!(%err, "stage 2 found no live services");
            return Ok(PipelineOutcome::Empty);
        }

        let candidates = vhost_candidates(&resolved);

        info!("");
        let findings = self
            .find_vhosts
            .run(scanned, candidates, self.max_vhost_candidates)
            .await;

        let vhosts_found: usize = findings.iter().map(|f| f.findings.len()).sum();

        info!("");
        if vhosts_found == 0 {
            info!("No vhosts found");
        } else {
            self.results_sink.save(&findings).await?;
            info!("Saved results ({vhosts_found} vhosts)");
        }

        Ok(PipelineOutcome::Saved { vhosts_found })
    }
}

fn vhost_candidates(resolved: &[ResolvedDomain]) -> Vec<String> {
    resolved
        .iter()
        .filter(|d| d.is_vhost_candidate())
        .map(|d| d.domain.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{DnsResolverPort, FindingLogger, PortProberPort, ProbeError, ProgressSink, VhostProbeClient, VhostProbeClientFactory};
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;
    use vhost_sieve_domain::{HttpResponse, Scheme, Service};

    struct NoopProgress;
    impl ProgressSink for NoopProgress {
        fn reset(&self, _total: usize) {}
        fn done(&self) {}
    }

    struct NoopLogger;
    #[async_trait]
    impl FindingLogger for NoopLogger {
        async fn log_finding(&self, _ip: Ipv4Addr, _port: u16, _scheme: Scheme, _candidate: &str, _response: &HttpResponse) {}
    }

    struct RecordingSink {
        saved: Mutex<Vec<usize>>,
    }
    #[async_trait]
    impl ResultsSink for RecordingSink {
        async fn save(&self, findings: &[vhost_sieve_domain::IpVhostFindings]) -> Result<(), SieveError> {
            self.saved.lock().unwrap().push(findings.len());
            Ok(())
        }
    }

    struct OneHostResolver;
    #[async_trait]
    impl DnsResolverPort for OneHostResolver {
        async fn resolve_public_ipv4(&self, domain: &str) -> Vec<Ipv4Addr> {
            if domain == "live.test" {
                vec![Ipv4Addr::new(198, 51, 100, 1)]
            } else {
                vec![]
            }
        }
    }

    struct AllPortsClosedResolver;
    #[async_trait]
    impl DnsResolverPort for AllPortsClosedResolver {
        async fn resolve_public_ipv4(&self, _domain: &str) -> Vec<Ipv4Addr> {
            vec![]
        }
    }

    struct OnePortOpenProber;
    #[async_trait]
    impl PortProberPort for OnePortOpenProber {
        async fn probe(&self, _ip: Ipv4Addr, port: u16) -> Option<Scheme> {
            if port == 443 {
                Some(Scheme::Https)
            } else {
                None
            }
        }
    }

    struct OneRealVhostClient;
    #[async_trait]
    impl VhostProbeClient for OneRealVhostClient {
        async fn get(&self, vhost_name: &str) -> Result<HttpResponse, ProbeError> {
            if vhost_name == "shadow.test" {
                Ok(HttpResponse::new(200, None, "unique shadow vhost body content here".to_string(), vec![]))
            } else {
                Ok(HttpResponse::new(404, None, "default not found page".to_string(), vec![]))
            }
        }
    }

    struct OneRealVhostFactory;
    #[async_trait]
    impl VhostProbeClientFactory for OneRealVhostFactory {
        async fn build(&self, _ip: Ipv4Addr, _service: Service, _injected_names: &[String]) -> Box<dyn VhostProbeClient> {
            Box::new(OneRealVhostClient)
        }
    }

    fn build_pipeline(
        resolver: impl DnsResolverPort + 'static,
        prober: impl PortProberPort + 'static,
        factory: impl VhostProbeClientFactory + 'static,
        sink: Arc<RecordingSink>,
    ) -> PipelineUseCase {
        let resolve_domains =
            ResolveDomainsUseCase::new(Arc::new(resolver), Arc::new(NoopProgress), 4);
        let scan_ips = ScanIpsUseCase::new(Arc::new(prober), Arc::new(NoopProgress), 4, vec![80, 443]);
        let find_vhosts = FindVhostsUseCase::new(Arc::new(factory), Arc::new(NoopProgress), Arc::new(NoopLogger), 4);
        PipelineUseCase::new(resolve_domains, scan_ips, find_vhosts, sink, SampleCap::Unbounded)
    }

    #[tokio::test]
    async fn end_to_end_happy_path_saves_findings() {
        let sink = Arc::new(RecordingSink { saved: Mutex::new(vec![]) });
        let pipeline = build_pipeline(OneHostResolver, OnePortOpenProber, OneRealVhostFactory, Arc::clone(&sink));

        let domains = vec!["live.test".to_string(), "shadow.test".to_string()];
        let outcome = pipeline
            .run(domains, SampleCap::Unbounded, SampleCap::Unbounded)
            .await
            .unwrap();

        match outcome {
            PipelineOutcome::Saved { vhosts_found } => assert_eq!(vhosts_found, 1),
            PipelineOutcome::Empty => panic!("expected a saved outcome"),
        }
        assert_eq!(sink.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stage_one_emptiness_short_circuits_without_saving() {
        let sink = Arc::new(RecordingSink { saved: Mutex::new(vec![]) });
        let pipeline = build_pipeline(AllPortsClosedResolver, OnePortOpenProber, OneRealVhostFactory, Arc::clone(&sink));

        let domains = vec!["only-candidate.test".to_string()];
        let outcome = pipeline
            .run(domains, SampleCap::Unbounded, SampleCap::Unbounded)
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Empty));
        assert!(sink.saved.lock().unwrap().is_empty());
    }
}
