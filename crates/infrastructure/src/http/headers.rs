use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, HOST, USER_AGENT};

/// `User-Agent`/`Accept`/`Accept-Language` common to every outbound probe
/// (spec.md §4.5 scheme detection, §4.6.1 request construction).
pub fn base_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).unwrap_or_else(|_| HeaderValue::from_static("vhost-sieve")));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

/// Forensic headers added to every vhost-candidate probe in stage 3
/// (spec.md §4.6.1), meant to coax trust-based Host/IP gating into
/// revealing internal vhosts.
pub fn forensic_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("X-Forwarded-For", HeaderValue::from_static("127.0.0.1"));
    headers.insert("X-Originating-IP", HeaderValue::from_static("[127.0.0.1]"));
    headers.insert("X-Remote-IP", HeaderValue::from_static("127.0.0.1"));
    headers.insert("X-Remote-Addr", HeaderValue::from_static("127.0.0.1"));
    headers
}

/// Explicit `Host` header used when SNI injection is disabled (the target
/// URL carries the bare IP, so the client would otherwise send `ip:port`).
pub fn host_header(name: &str) -> Option<(reqwest::header::HeaderName, HeaderValue)> {
    HeaderValue::from_str(name).ok().map(|value| (HOST, value))
}
