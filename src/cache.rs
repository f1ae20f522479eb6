use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use anyhow::Context;
use parking_lot::{Mutex, RwLock};

use crate::probe::ProbeResult;

/// Append-only JSONL log of probe results, keyed by path, for resuming scans.
pub struct ResumeCache {
    path: PathBuf,
    seen: RwLock<AHashSet<String>>,
    write_lock: Mutex<()>,
}

fn path_of_line(line: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(line).ok()?;
    match v.get("path")?.as_str()? {
        "" => None,
        p => Some(p.to_string()),
    }
}

impl ResumeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), seen: RwLock::new(AHashSet::new()), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the log into the seen set. A missing or unreadable file means nothing was seen;
    /// lines that do not parse are skipped.
    pub fn load_seen(&self) -> AHashSet<String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error=%e, path=%self.path.display(), "cache unreadable, starting fresh");
                }
                return AHashSet::new();
            }
        };

        let mut seen = AHashSet::new();
        let mut skipped = 0usize;
        for line in data.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match path_of_line(line) {
                Some(p) => {
                    seen.insert(p);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, path=%self.path.display(), "skipped malformed cache lines");
        }
        *self.seen.write() = seen.clone();
        seen
    }

    pub fn should_skip(&self, path: &str) -> bool {
        self.seen.read().contains(path)
    }

    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }

    /// Append one record and remember its path without needing a reload.
    pub fn append_result(&self, result: &ProbeResult) -> anyhow::Result<()> {
        let line = serde_json::to_string(result)?;
        {
            let _guard = self.write_lock.lock();
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    crate::utils::ensure_dir(parent)?;
                }
            }
            let mut f = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)
                .with_context(|| format!("opening cache {}", self.path.display()))?;
            f.write_all(line.as_bytes())?;
            f.write_all(b"\n")?;
        }
        if !result.path.is_empty() {
            self.seen.write().insert(result.path.clone());
        }
        Ok(())
    }
}
