use async_trait::async_trait;
use std::path::PathBuf;
use vhost_sieve_application::ports::ResultsSink;
use vhost_sieve_domain::{IpVhostFindings, SieveError};

/// Writes the flat text output file of spec.md §6: one line per
/// `(ip, service)` pair with at least one finding.
pub struct FileResultsSink {
    output_file: PathBuf,
}

impl FileResultsSink {
    pub fn new(output_file: PathBuf) -> Self {
        Self { output_file }
    }
}

#[async_trait]
impl ResultsSink for FileResultsSink {
    async fn save(&self, findings: &[IpVhostFindings]) -> Result<(), SieveError> {
        let mut contents = String::new();
        for ip_findings in findings {
            for finding in &ip_findings.findings {
                if finding.is_empty() {
                    continue;
                }
                contents.push_str(&ip_findings.ip.to_string());
                contents.push(' ');
                contents.push_str(&finding.service.port.to_string());
                contents.push(' ');
                contents.push_str(finding.service.scheme.as_str());
                contents.push(' ');
                contents.push_str(if finding.stopped { "True" } else { "False" });
                for hit in &finding.hits {
                    contents.push(' ');
                    contents.push_str(&hit.render());
                }
                contents.push('\n');
            }
        }

        tokio::fs::write(&self.output_file, contents).await?;
        Ok(())
    }
}
