use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::TransportError;
use crate::http_client::{Transport, TransportResponse, ROTATION_USER_AGENTS};
use crate::probe::rate_limit::RateLimiter;
use crate::probe::ProbeResult;
use crate::target::{normalize_path, ScanTarget};

pub const MAX_ATTEMPTS: usize = 3;
const BACKOFF_INITIAL_MS: u64 = 200;
const BACKOFF_MAX_MS: u64 = 10_000;
const JITTER_MAX_MS: u64 = 1_000;

enum Attempt {
    Completed(TransportResponse),
    Retryable(TransportError),
}

enum ProbeOutcome {
    Completed(TransportResponse),
    Exhausted { attempts: usize, last_error: TransportError },
}

/// Wait before the retry following attempt number `attempt` (1-based).
pub fn backoff_delay(attempt: usize, jitter_ms: u64) -> Duration {
    let exp = BACKOFF_INITIAL_MS.saturating_mul(1u64 << (attempt.saturating_sub(1)).min(16));
    Duration::from_millis(exp.saturating_add(jitter_ms).min(BACKOFF_MAX_MS))
}

/// Executes one probe unit: optional rate gate, GET, retries on transport failure.
#[derive(Clone)]
pub struct HttpProber {
    transport: Arc<dyn Transport>,
    limiter: Option<Arc<RateLimiter>>,
    rotate_user_agents: bool,
}

impl HttpProber {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, limiter: None, rotate_user_agents: false }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<RateLimiter>>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_user_agent_rotation(mut self, rotate: bool) -> Self {
        self.rotate_user_agents = rotate;
        self
    }

    fn pick_user_agent(&self) -> Option<&'static str> {
        if !self.rotate_user_agents {
            return None;
        }
        ROTATION_USER_AGENTS.choose(&mut rand::thread_rng()).copied()
    }

    async fn attempt(&self, url: &str) -> Attempt {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }
        match self.transport.get(url, self.pick_user_agent()).await {
            Ok(resp) => Attempt::Completed(resp),
            Err(e) => Attempt::Retryable(e),
        }
    }

    async fn fetch_with_retries(&self, url: &str) -> ProbeOutcome {
        let mut attempt_no = 1;
        loop {
            match self.attempt(url).await {
                Attempt::Completed(resp) => return ProbeOutcome::Completed(resp),
                Attempt::Retryable(e) => {
                    tracing::debug!(url, attempt = attempt_no, error = %e, "probe attempt failed");
                    if attempt_no >= MAX_ATTEMPTS {
                        return ProbeOutcome::Exhausted { attempts: attempt_no, last_error: e };
                    }
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MS);
                    tokio::time::sleep(backoff_delay(attempt_no, jitter)).await;
                    attempt_no += 1;
                }
            }
        }
    }

    /// Never fails: transport trouble becomes a status-0 result.
    pub async fn probe(&self, target: &ScanTarget, path: &str) -> ProbeResult {
        let path = normalize_path(path);
        if path.is_empty() {
            return ProbeResult::empty_path();
        }
        let url = target.resolve(&path);

        match self.fetch_with_retries(&url).await {
            ProbeOutcome::Completed(resp) => ProbeResult {
                ok: resp.status == 200,
                status: resp.status,
                redirected: resp.redirected,
                final_url: resp.final_url,
                elapsed_ms: resp.elapsed_ms,
                content_length: resp.content_length,
                path,
                url,
            },
            ProbeOutcome::Exhausted { attempts, last_error } => {
                tracing::warn!(url = %url, attempts, error = %last_error, "probe gave up");
                ProbeResult::unreachable(path, url)
            }
        }
    }
}
