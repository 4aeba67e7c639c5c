use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("domains file not found: {0}")]
    DomainsFileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no public IPs found among resolved domains")]
    NoPublicIpsFound,

    #[error("no non-resolvable domains (vhost candidates) found")]
    NoVhostCandidatesFound,

    #[error("no services found on any scanned IP")]
    NoServicesFound,
}
