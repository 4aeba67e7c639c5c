use clap::Parser;
use std::path::PathBuf;
use vhost_sieve_domain::config::{
    SampleCap, DEFAULT_PORTS, DEFAULT_THREADS_NUMBER, DEFAULT_TIMEOUT_HTTP_SECS, DEFAULT_TIMEOUT_TCP_SECS,
    DEFAULT_USER_AGENT,
};

/// Discovers virtual hosts served by the hosts behind a domain corpus's
/// resolvable IPs, using the corpus's non-resolvable names as candidates.
#[derive(Debug, Parser)]
#[command(name = "vhost-sieve", version, about)]
pub struct Args {
    /// Input text file; one domain per non-empty line.
    #[arg(short = 'd', long = "domains-file")]
    pub domains_file: PathBuf,

    /// Output text file (overwritten).
    #[arg(short = 'o', long = "output-file")]
    pub output_file: PathBuf,

    /// Directory to dump full responses for each positive finding; created if missing.
    #[arg(short = 'l', long = "logs-dir")]
    pub logs_dir: Option<PathBuf>,

    /// Comma-separated uint16 list of ports to scan.
    #[arg(short = 'p', long = "ports-to-scan", value_delimiter = ',', default_values_t = DEFAULT_PORTS.to_vec())]
    pub ports_to_scan: Vec<u16>,

    /// Number of concurrent workers per pipeline stage.
    #[arg(short = 't', long = "threads-number", default_value_t = DEFAULT_THREADS_NUMBER)]
    pub threads_number: usize,

    /// TCP connect timeout, in seconds.
    #[arg(long = "timeout-tcp", default_value_t = DEFAULT_TIMEOUT_TCP_SECS)]
    pub timeout_tcp: f64,

    /// HTTP request timeout, in seconds.
    #[arg(long = "timeout-http", default_value_t = DEFAULT_TIMEOUT_HTTP_SECS)]
    pub timeout_http: f64,

    /// Maximum number of domains to resolve; -1 means no cap.
    #[arg(long = "max-domains", default_value_t = -1)]
    pub max_domains: i64,

    /// Maximum number of IPs to scan; -1 means no cap.
    #[arg(long = "max-ips", default_value_t = -1)]
    pub max_ips: i64,

    /// Maximum number of vhost candidates to probe per service; -1 means no cap.
    #[arg(long = "max-vhost-candidates", default_value_t = -1)]
    pub max_vhost_candidates: i64,

    /// User-Agent header sent with every probe.
    #[arg(short = 'u', long = "user-agent", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Use TLS SNI + name injection instead of Host-header-only probing.
    #[arg(long = "enable-sni", action = clap::ArgAction::SetTrue)]
    pub enable_sni: bool,

    /// Additional diagnostic output.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Args {
    pub fn max_domains_cap(&self) -> SampleCap {
        SampleCap::from_cli(self.max_domains)
    }

    pub fn max_ips_cap(&self) -> SampleCap {
        SampleCap::from_cli(self.max_ips)
    }

    pub fn max_vhost_candidates_cap(&self) -> SampleCap {
        SampleCap::from_cli(self.max_vhost_candidates)
    }
}
