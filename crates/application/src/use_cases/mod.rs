mod find_vhosts;
mod pipeline;
mod resolve_domains;
mod scan_ips;

pub use find_vhosts::FindVhostsUseCase;
pub use pipeline::{PipelineOutcome, PipelineUseCase};
pub use resolve_domains::ResolveDomainsUseCase;
pub use scan_ips::ScanIpsUseCase;
