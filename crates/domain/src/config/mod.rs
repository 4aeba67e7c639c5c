//! Pipeline configuration.
//!
//! `SieveConfig` is the validated value the rest of the crate works with.
//! The CLI layer is responsible for parsing flags into it and calling
//! [`SieveConfig::validate`] before the pipeline starts.

mod limits;

pub use limits::SampleCap;

use crate::errors::SieveError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORTS: &[u16] = &[80, 443, 8000, 8008, 8080, 8443];
pub const DEFAULT_THREADS_NUMBER: usize = 16;
pub const DEFAULT_TIMEOUT_TCP_SECS: f64 = 3.0;
pub const DEFAULT_TIMEOUT_HTTP_SECS: f64 = 5.0;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:68.0) Gecko/20100101 Firefox/68.0";

#[derive(Debug, Clone)]
pub struct SieveConfig {
    pub domains_file: PathBuf,
    pub output_file: PathBuf,
    pub logs_dir: Option<PathBuf>,
    pub ports: Vec<u16>,
    pub threads_number: usize,
    pub timeout_tcp: Duration,
    pub timeout_http: Duration,
    pub max_domains: SampleCap,
    pub max_ips: SampleCap,
    pub max_vhost_candidates: SampleCap,
    pub user_agent: String,
    pub sni_enabled: bool,
    pub verbose: bool,
}

impl SieveConfig {
    /// Validates invariants the CLI's own flag types cannot express
    /// (existence of the domains file, non-empty port list).
    pub fn validate(&self) -> Result<(), SieveError> {
        if self.ports.is_empty() {
            return Err(SieveError::InvalidConfig(
                "ports-to-scan must name at least one port".to_string(),
            ));
        }
        if self.threads_number == 0 {
            return Err(SieveError::InvalidConfig(
                "threads-number must be greater than zero".to_string(),
            ));
        }
        if !self.domains_file.exists() {
            return Err(SieveError::DomainsFileNotFound(
                self.domains_file.display().to_string(),
            ));
        }
        Ok(())
    }

    /// Sorted, deduplicated port list, as spec.md §4 requires.
    pub fn normalize_ports(mut ports: Vec<u16>) -> Vec<u16> {
        ports.sort_unstable();
        ports.dedup();
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(domains_file: PathBuf) -> SieveConfig {
        SieveConfig {
            domains_file,
            output_file: PathBuf::from("out.txt"),
            logs_dir: None,
            ports: DEFAULT_PORTS.to_vec(),
            threads_number: DEFAULT_THREADS_NUMBER,
            timeout_tcp: Duration::from_secs_f64(DEFAULT_TIMEOUT_TCP_SECS),
            timeout_http: Duration::from_secs_f64(DEFAULT_TIMEOUT_HTTP_SECS),
            max_domains: SampleCap::Unbounded,
            max_ips: SampleCap::Unbounded,
            max_vhost_candidates: SampleCap::Unbounded,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sni_enabled: false,
            verbose: false,
        }
    }

    #[test]
    fn rejects_empty_ports() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut config = base_config(tmp.path().to_path_buf());
        config.ports = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_domains_file() {
        let config = base_config(PathBuf::from("/nonexistent/does-not-exist.txt"));
        assert!(matches!(
            config.validate(),
            Err(SieveError::DomainsFileNotFound(_))
        ));
    }

    #[test]
    fn accepts_well_formed_config() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = base_config(tmp.path().to_path_buf());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn normalize_ports_sorts_and_dedups() {
        assert_eq!(
            SieveConfig::normalize_ports(vec![443, 80, 80, 8080]),
            vec![80, 443, 8080]
        );
    }
}
