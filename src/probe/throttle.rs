use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Holds both the global and the per-host slot. Dropping it releases both.
pub struct ConcurrencyPermit {
    _global: OwnedSemaphorePermit,
    _host: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for ConcurrencyPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Global concurrency ceiling plus an independent ceiling per destination host.
pub struct ConcurrencyController {
    global: Arc<Semaphore>,
    per_host: DashMap<String, Arc<Semaphore>>,
    per_host_limit: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl ConcurrencyController {
    pub fn new(global_limit: usize, per_host_limit: usize) -> Self {
        Self {
            global: Arc::new(Semaphore::new(global_limit.max(1))),
            per_host: DashMap::new(),
            per_host_limit: per_host_limit.max(1),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
            errors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create the host's slot pool ahead of dispatch. No-op if it already exists.
    pub fn register_host(&self, host: &str) {
        self.host_semaphore(host);
    }

    pub fn host_count(&self) -> usize {
        self.per_host.len()
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        if let Some(s) = self.per_host.get(host) {
            return s.value().clone();
        }
        // entry() holds the shard lock, so two units racing on a new host share one semaphore
        self.per_host
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .value()
            .clone()
    }

    /// Acquire global then host. Every caller uses this order.
    pub async fn acquire(&self, host: &str) -> ConcurrencyPermit {
        let host_sem = self.host_semaphore(host);
        let global = self.global.clone().acquire_owned().await.expect("global semaphore closed");
        let host = host_sem.acquire_owned().await.expect("host semaphore closed");
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ConcurrencyPermit { _global: global, _host: host, in_flight: self.in_flight.clone() }
    }

    /// Spawn every unit at once; each waits for its slots, runs, then releases.
    /// Outputs come back in completion order. A unit whose task panicked yields `None`.
    pub async fn dispatch<T, F, Fut>(
        self: &Arc<Self>,
        host: &str,
        units: Vec<T>,
        task_fn: F,
    ) -> Vec<Option<Fut::Output>>
    where
        F: Fn(T) -> Fut + Clone + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        T: Send + 'static,
    {
        self.register_host(host);
        let mut futures = FuturesUnordered::new();

        for unit in units {
            let controller = Arc::clone(self);
            let host = host.to_string();
            let task_fn = task_fn.clone();

            futures.push(tokio::spawn(async move {
                let permit = controller.acquire(&host).await;
                let output = task_fn(unit).await;
                drop(permit);
                controller.completed.fetch_add(1, Ordering::Relaxed);
                output
            }));
        }

        let mut results = Vec::with_capacity(futures.len());
        while let Some(joined) = futures.next().await {
            match joined {
                Ok(output) => results.push(Some(output)),
                Err(e) => {
                    tracing::error!(error=%e, "probe task failed");
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    results.push(None);
                }
            }
        }
        results
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of units holding slots at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// (completed, errors)
    pub fn stats(&self) -> (usize, usize) {
        (self.completed.load(Ordering::Relaxed), self.errors.load(Ordering::Relaxed))
    }
}
