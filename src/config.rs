use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ScanError};

/// Knobs shared by every probe unit of one scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub concurrency: usize,
    pub per_host_concurrency: usize,
    /// Requests per second across the whole scan. `None` means unthrottled.
    pub rate_limit: Option<f64>,
    pub rate_burst: u32,
    pub timeout_secs: f64,
    pub verify_tls: bool,
    pub follow_redirects: bool,
    pub proxy: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub rotate_user_agents: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 100,
            per_host_concurrency: 10,
            rate_limit: None,
            rate_burst: 1,
            timeout_secs: 10.0,
            verify_tls: true,
            follow_redirects: true,
            proxy: None,
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            rotate_user_agents: false,
        }
    }
}

impl ScanOptions {
    /// Rejects values that would make the scan meaningless. Called before any I/O.
    pub fn validate(&self) -> Result<()> {
        if !self.timeout_secs.is_finite()
            || self.timeout_secs <= 0.0
            || Duration::try_from_secs_f64(self.timeout_secs).is_err()
        {
            return Err(ScanError::InvalidParameter(format!(
                "timeout must be > 0 seconds, got {}",
                self.timeout_secs
            )));
        }
        if let Some(rate) = self.rate_limit {
            if !rate.is_finite() || rate <= 0.0 || Duration::try_from_secs_f64(1.0 / rate).is_err() {
                return Err(ScanError::InvalidParameter(format!(
                    "rate limit must be > 0 requests/sec, got {rate}"
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn effective_per_host(&self) -> usize {
        self.per_host_concurrency.max(1)
    }
}
