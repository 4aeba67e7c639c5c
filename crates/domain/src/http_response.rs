use crate::similarity::sequence_ratio;

/// Number of leading characters of the decoded body compared for
/// similarity (spec.md §3).
pub const BODY_PREFIX_LEN: usize = 512;

/// Minimum ratio for two response bodies to be considered equivalent
/// (spec.md §3).
pub const SIMILARITY_THRESHOLD: f64 = 0.80;

/// A canonicalized HTTP response, reduced to exactly the fields the
/// discrimination procedure's equivalence relation needs (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub location_key: String,
    pub body_prefix: String,
    pub body_full: String,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Builds the canonical response from its already-decoded parts.
    ///
    /// When a `Location` header is present, `body_prefix` is left empty —
    /// redirect equivalence never inspects the body (spec.md §3).
    pub fn new(
        status: u16,
        location_header: Option<&str>,
        body_full: String,
        headers: Vec<(String, String)>,
    ) -> Self {
        let location_key = location_header.map(parse_location_key).unwrap_or_default();
        let body_prefix = if location_header.is_some() {
            String::new()
        } else {
            body_full.chars().take(BODY_PREFIX_LEN).collect()
        };
        Self {
            status,
            location_key,
            body_prefix,
            body_full,
            headers,
        }
    }

    /// The response-similarity equivalence relation of spec.md §3: equal
    /// status, equal `location_key`, and a body-prefix similarity ratio at
    /// or above [`SIMILARITY_THRESHOLD`]. Reflexive and symmetric for all
    /// finite responses.
    pub fn is_similar(&self, other: &HttpResponse) -> bool {
        self.status == other.status
            && self.location_key == other.location_key
            && sequence_ratio(&self.body_prefix, &other.body_prefix) >= SIMILARITY_THRESHOLD
    }
}

/// `scheme || netloc || path` of a `Location` header parsed as a URL,
/// dropping query and fragment (spec.md §3, §9 Open Questions). Relative
/// references (no scheme/authority) pass through unchanged, matching
/// Python's `urlparse` on a bare path.
fn parse_location_key(header: &str) -> String {
    match url::Url::parse(header) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            let host = parsed.host_str().unwrap_or("");
            let netloc = match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            format!("{scheme}{netloc}{}", parsed.path())
        }
        // Not an absolute URL (e.g. a bare path). `urlparse` still succeeds
        // in that case with empty scheme/netloc, so only the path survives
        // once query and fragment are stripped.
        Err(_) => header
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
