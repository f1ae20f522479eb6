pub mod http_probe;
pub mod rate_limit;
pub mod throttle;

use serde::{Deserialize, Serialize};

pub use http_probe::HttpProber;
pub use rate_limit::RateLimiter;
pub use throttle::{ConcurrencyController, ConcurrencyPermit};

/// Outcome of one probe unit. Only the final attempt is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub path: String,
    pub url: String,
    pub status: u16,
    pub ok: bool,
    pub redirected: bool,
    pub final_url: String,
    pub elapsed_ms: u64,
    pub content_length: u64,
}

impl ProbeResult {
    /// Blank candidate: nothing was sent.
    pub fn empty_path() -> Self {
        Self::sentinel(String::new(), String::new(), String::new())
    }

    /// Every attempt failed before a response arrived. `final_url` keeps the attempted URL.
    pub fn unreachable(path: String, url: String) -> Self {
        let final_url = url.clone();
        Self::sentinel(path, url, final_url)
    }

    fn sentinel(path: String, url: String, final_url: String) -> Self {
        Self {
            path,
            url,
            status: 0,
            ok: false,
            redirected: false,
            final_url,
            elapsed_ms: 0,
            content_length: 0,
        }
    }
}
