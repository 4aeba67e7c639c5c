use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use tracing::warn;
use vhost_sieve_application::ports::FindingLogger;
use vhost_sieve_domain::{HttpResponse, Scheme};

/// Dumps the full response of a positive finding to `<logs_dir>/
/// <ip>_<port>_<scheme>_<candidate>_<status>` (spec.md §4.7, §6), one
/// header per line, a blank line, then the body.
///
/// Absent entirely when `--logs-dir` was not given (spec.md §7: a
/// write failure is `warn!`'d and never fails the finding, so the whole
/// sink is optional in the same spirit).
pub struct FileFindingLogger {
    logs_dir: PathBuf,
}

impl FileFindingLogger {
    pub fn new(logs_dir: PathBuf) -> Self {
        Self { logs_dir }
    }
}

#[async_trait]
impl FindingLogger for FileFindingLogger {
    async fn log_finding(&self, ip: Ipv4Addr, port: u16, scheme: Scheme, candidate: &str, response: &HttpResponse) {
        let filename = format!("{ip}_{port}_{scheme}_{candidate}_{}", response.status);
        let path = self.logs_dir.join(filename);

        let mut contents = String::new();
        for (name, value) in &response.headers {
            contents.push_str(name);
            contents.push_str(": ");
            contents.push_str(value);
            contents.push('\n');
        }
        contents.push('\n');
        contents.push_str(&response.body_full);

        if let Err(error) = tokio::fs::create_dir_all(&self.logs_dir).await {
            warn!(%error, path = %path.display(), "failed to create logs directory");
            return;
        }
        if let Err(error) = tokio::fs::write(&path, contents).await {
            warn!(%error, path = %path.display(), "failed to write finding log");
        }
    }
}
