use url::Url;

use crate::error::{Result, ScanError};

/// Validated base URL every candidate path is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    base: String,
    url: Url,
}

impl ScanTarget {
    /// Accepts `example.com`, `example.com/`, `https://example.com:8443/` and friends.
    pub fn parse(raw: &str) -> Result<Self> {
        let base = normalize_base_url(raw);
        let url = Url::parse(&base).map_err(|e| ScanError::InvalidTarget(format!("{raw:?}: {e}")))?;
        if url.host_str().is_none() {
            return Err(ScanError::InvalidTarget(format!("{raw:?}: missing host")));
        }
        Ok(Self { base, url })
    }

    /// Base URL without trailing slash.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// `host:port` with the scheme's default port filled in.
    pub fn host_key(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Absolute URL for an already-normalized, non-empty path.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Prepend `http://` when no scheme is given. Query, fragment and trailing slashes
/// are dropped so paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.split(['?', '#']).next().unwrap_or_default();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Canonical form of a candidate path: trimmed, leading `/`. Blank input becomes `""`.
/// Used for dedupe keys, ordering keys and the path stored in results alike.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
