//! Durable, memoized repository-metadata cache with bounded-backoff retries.
//!
//! Two layers: a durable map persisted to a pretty-printed JSON file (only
//! successful lookups), and a process-local memo that additionally remembers
//! default-producing failures so a URL that exhausted its retry budget is not
//! re-fetched for the remainder of the run. The durable file never stores
//! defaults, so the next run retries cleanly.

use log::{debug, error, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::RepoInfoProvider;
use crate::types::RepoMeta;
use crate::utils::config::RetryConsts;

/// Bounded exponential backoff: delay for retry `n` is `base * 2^n`, capped
/// at `max_delay`. At most `max_retries` retries follow the initial attempt.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: RetryConsts::MAX_RETRIES,
            base_delay: RetryConsts::BASE_DELAY,
            max_delay: RetryConsts::BACKOFF_CAP,
        }
    }
}

impl RetryPolicy {
    /// Default policy with the base delay jittered uniformly over
    /// `[1, 3)` seconds, sampled once per run.
    pub fn jittered() -> Self {
        use rand::Rng;
        let base = rand::rng().random_range(1.0..3.0);
        Self {
            base_delay: Duration::from_secs_f64(base),
            ..Self::default()
        }
    }

    /// Zero-delay policy for tests: retries still count, sleeps do not.
    pub fn no_delay() -> Self {
        Self {
            base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based). Never exceeds `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.min(31)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Split a GitHub repository URL into (owner, repo). Returns None for
/// anything that is not a `github.com/<owner>/<repo>` URL.
pub fn parse_github_repo(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("github.com/"))?;
    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Memoized, persisted lookup of repository metadata by URL.
pub struct MetadataCache {
    path: PathBuf,
    provider: Box<dyn RepoInfoProvider>,
    policy: RetryPolicy,
    durable: HashMap<String, RepoMeta>,
    memo: HashMap<String, RepoMeta>,
}

impl MetadataCache {
    /// Open the cache at `path`, loading any previously persisted entries.
    /// A missing file starts empty; an unreadable or corrupt file is logged
    /// and treated as empty (staleness and loss here are accepted, the cache
    /// is an optimization).
    pub fn open(path: PathBuf, provider: Box<dyn RepoInfoProvider>, policy: RetryPolicy) -> Self {
        let durable = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("ignoring corrupt cache file {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("could not read cache file {}: {e}", path.display());
                HashMap::new()
            }
        };
        if !durable.is_empty() {
            debug!("loaded {} cached repo entries from {}", durable.len(), path.display());
        }
        Self {
            path,
            provider,
            policy,
            durable,
            memo: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of durably cached entries.
    pub fn len(&self) -> usize {
        self.durable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durable.is_empty()
    }

    /// Look up repository metadata for `url`. Never fails: any URL that is
    /// not a GitHub repository, and any lookup that exhausts its retries,
    /// yields the safe default (`stars = 0`, open source, empty description).
    pub fn lookup(&mut self, url: &str) -> RepoMeta {
        let Some((owner, repo)) = parse_github_repo(url) else {
            return RepoMeta::default();
        };
        if let Some(meta) = self.memo.get(url) {
            return meta.clone();
        }
        if let Some(meta) = self.durable.get(url) {
            let meta = meta.clone();
            self.memo.insert(url.to_string(), meta.clone());
            return meta;
        }

        match self.fetch_with_retry(&owner, &repo) {
            Some(meta) => {
                self.durable.insert(url.to_string(), meta.clone());
                self.persist();
                self.memo.insert(url.to_string(), meta.clone());
                meta
            }
            None => {
                // Memoized for this run only; the durable layer never stores
                // a negative result, so the next run retries the URL.
                let meta = RepoMeta::default();
                self.memo.insert(url.to_string(), meta.clone());
                meta
            }
        }
    }

    /// Bounded retry loop: one initial attempt plus up to `max_retries`
    /// retries for transient failures. Returns None on exhaustion or on the
    /// first non-transient failure.
    fn fetch_with_retry(&self, owner: &str, repo: &str) -> Option<RepoMeta> {
        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt);
                warn!(
                    "transient failure on {owner}/{repo}, waiting {:.1}s before retry {attempt}/{}",
                    delay.as_secs_f64(),
                    self.policy.max_retries
                );
                std::thread::sleep(delay);
            }
            match self.provider.fetch(owner, repo) {
                Ok(meta) => return Some(meta),
                Err(e) if e.is_transient() => {
                    debug!("transient failure fetching {owner}/{repo}: {e}");
                }
                Err(e) => {
                    warn!("could not fetch {owner}/{repo}: {e}");
                    return None;
                }
            }
        }
        warn!("giving up on {owner}/{repo} after {} retries", self.policy.max_retries);
        None
    }

    /// Write the durable layer to disk. Failures are logged, never raised;
    /// a lost cache write costs one re-fetch in a later run.
    fn persist(&self) {
        let result = serde_json::to_string_pretty(&self.durable)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&self.path, json).map_err(anyhow::Error::from));
        if let Err(e) = result {
            error!("failed to persist cache to {}: {e}", self.path.display());
        }
    }
}
