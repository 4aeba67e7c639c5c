use std::sync::Arc;
use tracing::info;
use vhost_sieve_domain::config::SampleCap;
use vhost_sieve_domain::{ResolvedDomain, SieveError};

use crate::ports::{DnsResolverPort, ProgressSink};
use crate::random_sample::{random_sample, unique};
use crate::worker_pool::run_stage;

/// Stage 1 of the pipeline (spec.md §4.4): resolves every input domain to
/// its public IPv4 addresses, partitioning the corpus into resolvable
/// domains and vhost candidates.
pub struct ResolveDomainsUseCase {
    resolver: Arc<dyn DnsResolverPort>,
    progress: Arc<dyn ProgressSink>,
    concurrency: usize,
}

impl ResolveDomainsUseCase {
    pub fn new(
        resolver: Arc<dyn DnsResolverPort>,
        progress: Arc<dyn ProgressSink>,
        concurrency: usize,
    ) -> Self {
        Self {
            resolver,
            progress,
            concurrency,
        }
    }

    /// `raw_domains` is whatever non-empty, trimmed lines the caller read
    /// from the domains file, in file order and possibly containing
    /// duplicates — deduplication and sampling happen here.
    pub async fn run(&self, raw_domains: Vec<String>, max_domains: SampleCap) -> Vec<ResolvedDomain> {
        let domains = random_sample(unique(raw_domains), max_domains.limit());

        info!("Resolving {} domains...", domains.len());
        self.progress.reset(domains.len());

        let resolver = Arc::clone(&self.resolver);
        let progress = Arc::clone(&self.progress);

        run_stage(domains, self.concurrency, move |domain| {
            let resolver = Arc::clone(&resolver);
            let progress = Arc::clone(&progress);
            async move {
                let ips = resolver.resolve_public_ipv4(&domain).await;
                progress.done();
                Some(ResolvedDomain::new(domain, ips))
            }
        })
        .await
    }

    /// Succeeds only if at least one domain resolved publicly and at least
    /// one did not (spec.md §4.4).
    pub fn validate(results: &[ResolvedDomain]) -> Result<(), SieveError> {
        let has_public_ip = results.iter().any(|r| !r.is_vhost_candidate());
        let has_candidate = results.iter().any(|r| r.is_vhost_candidate());
        if !has_public_ip {
            return Err(SieveError::NoPublicIpsFound);
        }
        if !has_candidate {
            return Err(SieveError::NoVhostCandidatesFound);
        }
        Ok(())
    }
}
