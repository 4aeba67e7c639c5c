use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::info;
use vhost_sieve_domain::config::SampleCap;
use vhost_sieve_domain::{HttpResponse, IpVhostFindings, ScannedIp, Service, SieveError, VhostFinding, VhostHit};

use crate::ports::{FindingLogger, ProgressSink, VhostProbeClientFactory};
use crate::random_sample::{random_sample, random_vhost_label};
use crate::worker_pool::run_stage;

/// Consecutive-error/consecutive-valid-hit limits for the early-stopping
/// rule (spec.md §4.6.1 step 4, §9 Design Notes): once a streak strictly
/// exceeds this many candidates in a row, the service is abandoned.
const ERROR_STREAK_LIMIT: u32 = 8;
const VALID_STREAK_LIMIT: u32 = 8;

/// Stage 3 of the pipeline (spec.md §4.6/§4.6.1): for every live service,
/// runs the vhost discrimination procedure against the candidate corpus.
pub struct FindVhostsUseCase {
    client_factory: Arc<dyn VhostProbeClientFactory>,
    progress: Arc<dyn ProgressSink>,
    finding_logger: Arc<dyn FindingLogger>,
    concurrency: usize,
}

impl FindVhostsUseCase {
    pub fn new(
        client_factory: Arc<dyn VhostProbeClientFactory>,
        progress: Arc<dyn ProgressSink>,
        finding_logger: Arc<dyn FindingLogger>,
        concurrency: usize,
    ) -> Self {
        Self {
            client_factory,
            progress,
            finding_logger,
            concurrency,
        }
    }

    pub async fn run(
        &self,
        scanned_ips: Vec<ScannedIp>,
        candidates: Vec<String>,
        max_vhost_candidates: SampleCap,
    ) -> Vec<IpVhostFindings> {
        let candidates = random_sample(candidates, max_vhost_candidates.limit());

        info!(
            "Probing {} live IPs against {} vhost candidates...",
            scanned_ips.len(),
            candidates.len()
        );
        self.progress.reset(scanned_ips.len());

        let candidates = Arc::new(candidates);
        let client_factory = Arc::clone(&self.client_factory);
        let progress = Arc::clone(&self.progress);
        let finding_logger = Arc::clone(&self.finding_logger);

        run_stage(scanned_ips, self.concurrency, move |scanned_ip| {
            let client_factory = Arc::clone(&client_factory);
            let progress = Arc::clone(&progress);
            let finding_logger = Arc::clone(&finding_logger);
            let candidates = Arc::clone(&candidates);
            async move {
                let mut findings = Vec::new();
                for service in &scanned_ip.services {
                    let (hits, stopped) = discriminate(
                        scanned_ip.ip,
                        *service,
                        &candidates,
                        client_factory.as_ref(),
                        finding_logger.as_ref(),
                    )
                    .await;
                    if !hits.is_empty() {
                        findings.push(VhostFinding {
                            service: *service,
                            stopped,
                            hits,
                        });
                    }
                }
                progress.done();
                if findings.is_empty() {
                    None
                } else {
                    Some(IpVhostFindings {
                        ip: scanned_ip.ip,
                        findings,
                    })
                }
            }
        })
        .await
    }

    /// Stage 3 has no failure mode of its own: an empty result set (no
    /// service leaked a vhost) is a legitimate, reportable outcome
    /// (spec.md §4.6), unlike stages 1 and 2 which guard against a corpus
    /// or scan that produced nothing to work with.
    pub fn validate(_results: &[IpVhostFindings]) -> Result<(), SieveError> {
        Ok(())
    }
}

/// Runs the full discrimination procedure (spec.md §4.6.1) for one
/// `(ip, service)` pair: baseline calibration against two random throwaway
/// labels, then a randomized sweep of `candidates` with streak-based
/// early stopping.
async fn discriminate(
    ip: Ipv4Addr,
    service: Service,
    candidates: &[String],
    client_factory: &dyn VhostProbeClientFactory,
    finding_logger: &dyn FindingLogger,
) -> (Vec<VhostHit>, bool) {
    let probe_r1 = random_vhost_label();
    let probe_r2 = random_vhost_label();

    let mut injected_names: Vec<String> = candidates.to_vec();
    injected_names.push(probe_r1.clone());
    injected_names.push(probe_r2.clone());

    let client = client_factory.build(ip, service, &injected_names).await;

    let reference = match client.get(&probe_r1).await {
        Ok(response) => response,
        Err(_) => return (Vec::new(), true),
    };

    let baseline_check: HttpResponse = match client.get(&probe_r2).await {
        Ok(response) => response,
        Err(_) => return (Vec::new(), true),
    };
    if !baseline_check.is_similar(&reference) {
        // The service responds differently to two equally-unknown names:
        // it is not consistent enough to discriminate against.
        return (Vec::new(), true);
    }

    let mut hits = Vec::new();
    let mut error_streak: u32 = 0;
    let mut valid_streak: u32 = 0;
    let mut stopped = false;

    for candidate in random_sample(candidates.to_vec(), None) {
        match client.get(&candidate).await {
            Err(_) => {
                error_streak += 1;
                valid_streak = 0;
                if error_streak > ERROR_STREAK_LIMIT {
                    stopped = true;
                    break;
                }
            }
            Ok(response) => {
                error_streak = 0;
                if response.is_similar(&reference) {
                    valid_streak = 0;
                } else {
                    finding_logger
                        .log_finding(ip, service.port, service.scheme, &candidate, &response)
                        .await;
                    hits.push(VhostHit::new(candidate, response.status));
                    valid_streak += 1;
                    if valid_streak > VALID_STREAK_LIMIT {
                        stopped = true;
                        break;
                    }
                }
            }
        }
    }

    (hits, stopped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use vhost_sieve_domain::Scheme;

    use crate::ports::{ProbeError, VhostProbeClient};

    struct NoopProgress;
    impl ProgressSink for NoopProgress {
        fn reset(&self, _total: usize) {}
        fn done(&self) {}
    }

    struct NoopLogger;
    #[async_trait]
    impl FindingLogger for NoopLogger {
        async fn log_finding(
            &self,
            _ip: Ipv4Addr,
            _port: u16,
            _scheme: Scheme,
            _candidate: &str,
            _response: &HttpResponse,
        ) {
        }
    }

    /// Responds identically to everything except a fixed set of "real"
    /// vhosts, which get a distinguishable body.
    struct ScriptedClient {
        real_vhosts: Vec<&'static str>,
    }

    #[async_trait]
    impl VhostProbeClient for ScriptedClient {
        async fn get(&self, vhost_name: &str) -> Result<HttpResponse, ProbeError> {
            if self.real_vhosts.contains(&vhost_name) {
                Ok(HttpResponse::new(200, None, "this is a totally distinct real vhost page unlike the catch-all default page at all".to_string(), vec![]))
            } else {
                Ok(HttpResponse::new(200, None, "default catch-all page content shown for any unknown name".to_string(), vec![]))
            }
        }
    }

    struct ScriptedFactory {
        real_vhosts: Vec<&'static str>,
    }

    #[async_trait]
    impl VhostProbeClientFactory for ScriptedFactory {
        async fn build(
            &self,
            _ip: Ipv4Addr,
            _service: Service,
            _injected_names: &[String],
        ) -> Box<dyn VhostProbeClient> {
            Box::new(ScriptedClient {
                real_vhosts: self.real_vhosts.clone(),
            })
        }
    }

    struct AlwaysErrorsClient;
    #[async_trait]
    impl VhostProbeClient for AlwaysErrorsClient {
        async fn get(&self, _vhost_name: &str) -> Result<HttpResponse, ProbeError> {
            Err(ProbeError)
        }
    }

    struct AlwaysErrorsFactory;
    #[async_trait]
    impl VhostProbeClientFactory for AlwaysErrorsFactory {
        async fn build(
            &self,
            _ip: Ipv4Addr,
            _service: Service,
            _injected_names: &[String],
        ) -> Box<dyn VhostProbeClient> {
            Box::new(AlwaysErrorsClient)
        }
    }

    fn some_service() -> Service {
        Service::new(443, Scheme::Https)
    }

    #[tokio::test]
    async fn finds_the_distinguishable_vhost_among_candidates() {
        let factory = Arc::new(ScriptedFactory {
            real_vhosts: vec!["real.test"],
        });
        let candidates = vec![
            "real.test".to_string(),
            "ghost-a.test".to_string(),
            "ghost-b.test".to_string(),
            "ghost-c.test".to_string(),
        ];

        let (hits, stopped) = discriminate(
            Ipv4Addr::new(198, 51, 100, 9),
            some_service(),
            &candidates,
            factory.as_ref(),
            &NoopLogger,
        )
        .await;

        assert!(!stopped);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "real.test");
        assert_eq!(hits[0].status, 200);
    }

    #[tokio::test]
    async fn baseline_request_failure_abandons_service_with_no_findings() {
        let factory = Arc::new(AlwaysErrorsFactory);
        let candidates = vec!["a.test".to_string(), "b.test".to_string()];

        let (hits, stopped) = discriminate(
            Ipv4Addr::new(198, 51, 100, 9),
            some_service(),
            &candidates,
            factory.as_ref(),
            &NoopLogger,
        )
        .await;

        assert!(stopped);
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn error_streak_past_limit_stops_early() {
        struct FlakyClient {
            calls: Mutex<u32>,
        }
        #[async_trait]
        impl VhostProbeClient for FlakyClient {
            async fn get(&self, _vhost_name: &str) -> Result<HttpResponse, ProbeError> {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                // First two calls are the baseline pair; everything after
                // always errors, so the error streak should trip the
                // limit long before the 50-candidate sweep completes.
                if *calls <= 2 {
                    Ok(HttpResponse::new(200, None, "baseline".to_string(), vec![]))
                } else {
                    Err(ProbeError)
                }
            }
        }
        struct FlakyFactory;
        #[async_trait]
        impl VhostProbeClientFactory for FlakyFactory {
            async fn build(
                &self,
                _ip: Ipv4Addr,
                _service: Service,
                _injected_names: &[String],
            ) -> Box<dyn VhostProbeClient> {
                Box::new(FlakyClient {
                    calls: Mutex::new(0),
                })
            }
        }

        let candidates: Vec<String> = (0..50).map(|i| format!("c{i}.test")).collect();
        let (hits, stopped) = discriminate(
            Ipv4Addr::new(198, 51, 100, 9),
            some_service(),
            &candidates,
            &FlakyFactory,
            &NoopLogger,
        )
        .await;

        assert!(stopped);
        assert!(hits.is_empty());
    }

    #[test]
    fn validate_never_fails_on_zero_findings() {
        assert!(FindVhostsUseCase::validate(&[]).is_ok());
    }
}
