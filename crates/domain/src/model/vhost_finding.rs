use super::service::Service;
use std::net::Ipv4Addr;

/// One positive vhost discovery: a candidate name and the HTTP status it
/// received, rendered exactly as `"<name> <status>"` (spec.md §6 output
/// format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostHit {
    pub name: String,
    pub status: u16,
}

impl VhostHit {
    pub fn new(name: impl Into<String>, status: u16) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn render(&self) -> String {
        format!("{} {}", self.name, self.status)
    }
}

/// The outcome of running the vhost discrimination procedure (spec.md
/// §4.6.1) against one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostFinding {
    pub service: Service,
    pub stopped: bool,
    pub hits: Vec<VhostHit>,
}

impl VhostFinding {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// All findings for one IP that had at least one positive finding on at
/// least one of its services (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpVhostFindings {
    pub ip: Ipv4Addr,
    pub findings: Vec<VhostFinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_renders_as_name_and_status() {
        let hit = VhostHit::new("b.test", 200);
        assert_eq!(hit.render(), "b.test 200");
    }
}
