use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;
use vhost_sieve_application::ports::PortProberPort;
use vhost_sieve_application::random_sample::random_vhost_label;
use vhost_sieve_domain::Scheme;

use super::headers::base_headers;
use super::name_override::NameOverride;

/// Stage 2's port/scheme prober (spec.md §4.5): a plain TCP connect gate
/// followed by a one-shot HTTPS-then-HTTP probe on success.
pub struct ReqwestPortProber {
    timeout_tcp: Duration,
    timeout_http: Duration,
    user_agent: String,
    sni_enabled: bool,
    dns_fallback: TokioAsyncResolver,
}

impl ReqwestPortProber {
    pub fn new(
        timeout_tcp: Duration,
        timeout_http: Duration,
        user_agent: String,
        sni_enabled: bool,
        dns_fallback: TokioAsyncResolver,
    ) -> Self {
        Self {
            timeout_tcp,
            timeout_http,
            user_agent,
            sni_enabled,
            dns_fallback,
        }
    }

    async fn tcp_connect_succeeds(&self, ip: Ipv4Addr, port: u16) -> bool {
        let addr = SocketAddr::from((ip, port));
        matches!(
            tokio::time::timeout(self.timeout_tcp, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }

    fn build_client(&self, sni_label: Option<&str>, ip: Ipv4Addr) -> reqwest::Client {
        let mut builder = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(true)
            .timeout(self.timeout_http)
            .default_headers(base_headers(&self.user_agent));

        if let Some(label) = sni_label {
            let resolver = NameOverride::new([label.to_string()], ip, self.dns_fallback.clone());
            builder = builder.dns_resolver(Arc::new(resolver));
        }

        builder
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }
}

#[async_trait]
impl PortProberPort for ReqwestPortProber {
    async fn probe(&self, ip: Ipv4Addr, port: u16) -> Option<Scheme> {
        if !self.tcp_connect_succeeds(ip, port).await {
            return None;
        }

        let sni_label = self.sni_enabled.then(random_vhost_label);
        let client = self.build_client(sni_label.as_deref(), ip);

        for scheme in Scheme::DETECTION_ORDER {
            let target = sni_label.as_deref().unwrap_or(&ip.to_string()).to_string();
            let url = format!("{scheme}://{target}:{port}/");
            match client.get(&url).send().await {
                Ok(_) => return Some(scheme),
                Err(error) => debug!(%ip, port, %scheme, %error, "scheme probe failed"),
            }
        }

        None
    }
}
