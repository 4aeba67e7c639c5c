mod resolved_domain;
mod service;
mod vhost_finding;

pub use resolved_domain::ResolvedDomain;
pub use service::{ScannedIp, Scheme, Service};
pub use vhost_finding::{IpVhostFindings, VhostFinding, VhostHit};
