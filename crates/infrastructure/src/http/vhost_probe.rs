use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use vhost_sieve_application::ports::{ProbeError, VhostProbeClient, VhostProbeClientFactory};
use vhost_sieve_domain::{HttpResponse, Service};

use super::headers::{base_headers, forensic_headers, host_header};
use super::name_override::NameOverride;

/// One persistent `reqwest::Client` per `(ip, service)` job, built per
/// spec.md §4.6.1 "Request construction": no redirects, no certificate
/// validation, the configured headers plus the forensic set on every call.
pub struct ReqwestVhostProbeClient {
    client: reqwest::Client,
    ip: Ipv4Addr,
    service: Service,
    sni_enabled: bool,
}

#[async_trait]
impl VhostProbeClient for ReqwestVhostProbeClient {
    async fn get(&self, vhost_name: &str) -> Result<HttpResponse, ProbeError> {
        let target = if self.sni_enabled {
            vhost_name.to_string()
        } else {
            self.ip.to_string()
        };
        let url = format!("{}://{target}:{}/", self.service.scheme, self.service.port);

        let mut request = self.client.get(&url).headers(forensic_headers());
        if !self.sni_enabled {
            if let Some((name, value)) = host_header(vhost_name) {
                request = request.header(name, value);
            }
        }

        let response = request.send().await.map_err(|_| ProbeError)?;
        let status = response.status().as_u16();
        let location_header = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect();
        let body_full = response.text().await.map_err(|_| ProbeError)?;

        Ok(HttpResponse::new(status, location_header.as_deref(), body_full, headers))
    }
}

/// Builds a [`ReqwestVhostProbeClient`] per job, pre-loading the SNI
/// override for exactly the names this job will probe (spec.md §4.1,
/// §4.6.1 step 1).
pub struct ReqwestVhostProbeClientFactory {
    timeout_http: Duration,
    user_agent: String,
    sni_enabled: bool,
    dns_fallback: TokioAsyncResolver,
}

impl ReqwestVhostProbeClientFactory {
    pub fn new(timeout_http: Duration, user_agent: String, sni_enabled: bool, dns_fallback: TokioAsyncResolver) -> Self {
        Self {
            timeout_http,
            user_agent,
            sni_enabled,
            dns_fallback,
        }
    }
}

#[async_trait]
impl VhostProbeClientFactory for ReqwestVhostProbeClientFactory {
    async fn build(&self, ip: Ipv4Addr, service: Service, injected_names: &[String]) -> Box<dyn VhostProbeClient> {
        let mut builder = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(true)
            .timeout(self.timeout_http)
            .default_headers(base_headers(&self.user_agent));

        if self.sni_enabled {
            let resolver = NameOverride::new(injected_names.to_vec(), ip, self.dns_fallback.clone());
            builder = builder.dns_resolver(Arc::new(resolver));
        }

        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Box::new(ReqwestVhostProbeClient {
            client,
            ip,
            service,
            sni_enabled: self.sni_enabled,
        })
    }
}
