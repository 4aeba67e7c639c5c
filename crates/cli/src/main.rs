mod args;
mod bootstrap;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use vhost_sieve_application::ports::{ProgressSink, ResultsSink};
use vhost_sieve_application::use_cases::{FindVhostsUseCase, PipelineOutcome, PipelineUseCase, ResolveDomainsUseCase, ScanIpsUseCase};
use vhost_sieve_infrastructure::dns::HickoryDnsResolver;
use vhost_sieve_infrastructure::http::{ReqwestPortProber, ReqwestVhostProbeClientFactory};
use vhost_sieve_infrastructure::logs::FileFindingLogger;
use vhost_sieve_infrastructure::output::FileResultsSink;
use vhost_sieve_infrastructure::progress::MutexProgressTracker;

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    bootstrap::init_logging(args.verbose);

    let config = bootstrap::load_config(&args)?;
    let raw_domains = bootstrap::read_domains(&config.domains_file).await?;

    info!("");
    info!("vhost-sieve starting");

    let hickory_resolver = HickoryDnsResolver::from_system_config(config.timeout_tcp);
    let dns_fallback = hickory_resolver.handle();
    let dns_resolver: Arc<dyn vhost_sieve_application::ports::DnsResolverPort> = Arc::new(hickory_resolver);

    let port_prober: Arc<dyn vhost_sieve_application::ports::PortProberPort> = Arc::new(ReqwestPortProber::new(
        config.timeout_tcp,
        config.timeout_http,
        config.user_agent.clone(),
        config.sni_enabled,
        dns_fallback.clone(),
    ));

    let vhost_client_factory: Arc<dyn vhost_sieve_application::ports::VhostProbeClientFactory> =
        Arc::new(ReqwestVhostProbeClientFactory::new(
            config.timeout_http,
            config.user_agent.clone(),
            config.sni_enabled,
            dns_fallback,
        ));

    let results_sink: Arc<dyn ResultsSink> = Arc::new(FileResultsSink::new(config.output_file.clone()));

    let finding_logger: Arc<dyn vhost_sieve_application::ports::FindingLogger> = match &config.logs_dir {
        Some(logs_dir) => Arc::new(FileFindingLogger::new(logs_dir.clone())),
        None => Arc::new(NullFindingLogger),
    };

    let progress_resolve: Arc<dyn ProgressSink> = Arc::new(MutexProgressTracker::new());
    let progress_scan: Arc<dyn ProgressSink> = Arc::new(MutexProgressTracker::new());
    let progress_find: Arc<dyn ProgressSink> = Arc::new(MutexProgressTracker::new());

    let resolve_domains = ResolveDomainsUseCase::new(dns_resolver, progress_resolve, config.threads_number);
    let scan_ips = ScanIpsUseCase::new(port_prober, progress_scan, config.threads_number, config.ports.clone());
    let find_vhosts = FindVhostsUseCase::new(vhost_client_factory, progress_find, finding_logger, config.threads_number);

    let pipeline = PipelineUseCase::new(resolve_domains, scan_ips, find_vhosts, results_sink, config.max_vhost_candidates);

    let outcome = pipeline
        .run(raw_domains, config.max_domains, config.max_ips)
        .await?;

    match outcome {
        PipelineOutcome::Saved { vhosts_found } if vhosts_found > 0 => {
            info!("vhost-sieve finished: {vhosts_found} vhosts found");
        }
        PipelineOutcome::Saved { .. } | PipelineOutcome::Empty => {
            info!("vhost-sieve finished: no vhosts found");
        }
    }

    Ok(())
}

/// Used when `--logs-dir` was not given: per-finding logging is simply
/// skipped rather than threading an `Option` through the use-case.
struct NullFindingLogger;

#[async_trait::async_trait]
impl vhost_sieve_application::ports::FindingLogger for NullFindingLogger {
    async fn log_finding(
        &self,
        _ip: std::net::Ipv4Addr,
        _port: u16,
        _scheme: vhost_sieve_domain::Scheme,
        _candidate: &str,
        _response: &vhost_sieve_domain::HttpResponse,
    ) {
    }
}
