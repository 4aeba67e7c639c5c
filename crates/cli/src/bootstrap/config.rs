use std::path::Path;
use std::time::Duration;
use tracing::info;
use vhost_sieve_domain::config::SieveConfig;
use vhost_sieve_domain::SieveError;

use crate::args::Args;

/// Builds and validates the pipeline configuration from parsed CLI
/// arguments, then logs the single startup banner the original tool
/// printed before any stage ran (`Logs dir:`, `Max domains to resolve:`,
/// ... `User agent:`).
pub fn load_config(args: &Args) -> Result<SieveConfig, SieveError> {
    let config = SieveConfig {
        domains_file: args.domains_file.clone(),
        output_file: args.output_file.clone(),
        logs_dir: args.logs_dir.clone(),
        ports: SieveConfig::normalize_ports(args.ports_to_scan.clone()),
        threads_number: args.threads_number,
        timeout_tcp: Duration::from_secs_f64(args.timeout_tcp),
        timeout_http: Duration::from_secs_f64(args.timeout_http),
        max_domains: args.max_domains_cap(),
        max_ips: args.max_ips_cap(),
        max_vhost_candidates: args.max_vhost_candidates_cap(),
        user_agent: args.user_agent.clone(),
        sni_enabled: args.enable_sni,
        verbose: args.verbose,
    };
    config.validate()?;

    info!("Domains file: {}", config.domains_file.display());
    info!("Output file: {}", config.output_file.display());
    info!(
        "Logs dir: {}",
        config
            .logs_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string())
    );
    info!("Ports to scan: {:?}", config.ports);
    info!("Threads number: {}", config.threads_number);
    info!("Timeout TCP: {:?}", config.timeout_tcp);
    info!("Timeout HTTP: {:?}", config.timeout_http);
    info!("Max domains to resolve: {:?}", config.max_domains);
    info!("Max IPs to scan: {:?}", config.max_ips);
    info!("Max vhost candidates: {:?}", config.max_vhost_candidates);
    info!("SNI enabled: {}", config.sni_enabled);
    info!("User agent: {}", config.user_agent);

    Ok(config)
}

/// Reads the domains file line by line, trimming and dropping empty
/// lines (spec.md §4.4 "Input"). Deduplication and sampling happen later,
/// in `ResolveDomainsUseCase`.
pub async fn read_domains(path: &Path) -> Result<Vec<String>, SieveError> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
