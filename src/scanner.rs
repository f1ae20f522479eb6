use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::cache::ResumeCache;
use crate::config::ScanOptions;
use crate::error::Result;
use crate::http_client::{ReqwestTransport, Transport};
use crate::probe::{ConcurrencyController, HttpProber, ProbeResult, RateLimiter};
use crate::target::{normalize_path, ScanTarget};
use crate::utils::dedupe_preserving_order;

/// Drives one scan: normalizes input, fans probes out under the concurrency and rate
/// limits, and hands results back in input order.
pub struct Scanner {
    options: ScanOptions,
    transport: Arc<dyn Transport>,
    cache: Option<Arc<ResumeCache>>,
    progress: Option<ProgressBar>,
}

impl Scanner {
    /// Validates options and builds the shared HTTP client. No network I/O happens here.
    pub fn new(options: ScanOptions) -> Result<Self> {
        options.validate()?;
        let transport = Arc::new(ReqwestTransport::from_options(&options)?);
        Ok(Self { options, transport, cache: None, progress: None })
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Paths already recorded in the cache are dropped before dispatch.
    pub fn with_cache(mut self, cache: Arc<ResumeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Ticked once per settled probe.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Normalized, deduplicated, cache-filtered candidates in first-seen order.
    /// This is exactly the list `scan` returns results for.
    pub fn prepare_paths<S: AsRef<str>>(&self, paths: &[S]) -> Vec<String> {
        let normalized = dedupe_preserving_order(paths.iter().map(|p| normalize_path(p.as_ref())));
        match &self.cache {
            Some(cache) => normalized.into_iter().filter(|p| !cache.should_skip(p)).collect(),
            None => normalized,
        }
    }

    pub async fn scan<S: AsRef<str>>(&self, base_url: &str, paths: &[S]) -> Result<Vec<ProbeResult>> {
        let target = Arc::new(ScanTarget::parse(base_url)?);
        let limiter = match self.options.rate_limit {
            Some(rate) => Some(Arc::new(RateLimiter::new(rate, self.options.rate_burst)?)),
            None => None,
        };
        let candidates = self.prepare_paths(paths);

        let prober = HttpProber::new(self.transport.clone())
            .with_rate_limiter(limiter)
            .with_user_agent_rotation(self.options.rotate_user_agents);
        let controller = Arc::new(ConcurrencyController::new(
            self.options.effective_concurrency(),
            self.options.effective_per_host(),
        ));
        let host = target.host_key();

        tracing::info!(
            target = %target.as_str(),
            host = %host,
            paths = candidates.len(),
            concurrency = self.options.effective_concurrency(),
            per_host = self.options.effective_per_host(),
            rate = ?self.options.rate_limit,
            "starting scan"
        );
        let started = Instant::now();

        let units: Vec<(usize, String)> = candidates.iter().cloned().enumerate().collect();
        let unit_target = target.clone();
        let progress = self.progress.clone();
        let outputs = controller
            .dispatch(&host, units, move |(idx, path): (usize, String)| {
                let prober = prober.clone();
                let target = unit_target.clone();
                let progress = progress.clone();
                async move {
                    let result = prober.probe(&target, &path).await;
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    (idx, result)
                }
            })
            .await;

        let mut slots: Vec<Option<ProbeResult>> = vec![None; candidates.len()];
        for (idx, result) in outputs.into_iter().flatten() {
            slots[idx] = Some(result);
        }
        let results: Vec<ProbeResult> = slots
            .into_iter()
            .zip(candidates)
            .map(|(slot, path)| slot.unwrap_or_else(|| lost_unit(&target, path)))
            .collect();

        let (completed, errors) = controller.stats();
        tracing::info!(
            results = results.len(),
            hits = results.iter().filter(|r| r.ok).count(),
            completed,
            errors,
            peak_in_flight = controller.peak_in_flight(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan finished"
        );
        Ok(results)
    }
}

/// Stand-in for a unit whose task died before producing a result.
fn lost_unit(target: &ScanTarget, path: String) -> ProbeResult {
    if path.is_empty() {
        ProbeResult::empty_path()
    } else {
        let url = target.resolve(&path);
        ProbeResult::unreachable(path, url)
    }
}

/// One-shot scan with a fresh client.
pub async fn scan<S: AsRef<str>>(base_url: &str, paths: &[S], options: &ScanOptions) -> Result<Vec<ProbeResult>> {
    Scanner::new(options.clone())?.scan(base_url, paths).await
}
