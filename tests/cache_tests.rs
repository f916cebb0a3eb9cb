//! Metadata cache tests: memoization layers, durable persistence, and the
//! bounded retry policy, using a scripted in-memory provider.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use toolscout::RepoMeta;
use toolscout::cache::{MetadataCache, RetryPolicy, parse_github_repo};
use toolscout::provider::{ProviderError, RepoInfoProvider};

/// Provider that replays a script of outcomes and counts calls.
struct FakeProvider {
    script: RefCell<VecDeque<Result<RepoMeta, ProviderError>>>,
    calls: Rc<Cell<usize>>,
}

impl FakeProvider {
    fn new(script: Vec<Result<RepoMeta, ProviderError>>) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                script: RefCell::new(script.into()),
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl RepoInfoProvider for FakeProvider {
    fn fetch(&self, _owner: &str, _repo: &str) -> Result<RepoMeta, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unavailable("script exhausted".into())))
    }
}

fn meta(stars: u64, name: &str) -> RepoMeta {
    RepoMeta {
        stars,
        description: format!("{name} description"),
        is_open_source: true,
        name: name.to_string(),
    }
}

fn open_cache(
    dir: &tempfile::TempDir,
    script: Vec<Result<RepoMeta, ProviderError>>,
) -> (MetadataCache, Rc<Cell<usize>>) {
    let (provider, calls) = FakeProvider::new(script);
    let cache = MetadataCache::open(
        dir.path().join("github_cache.json"),
        Box::new(provider),
        RetryPolicy::no_delay(),
    );
    (cache, calls)
}

// --- parse_github_repo ---

#[test]
fn test_parse_github_repo_valid() {
    assert_eq!(
        parse_github_repo("https://github.com/Kong/kong"),
        Some(("Kong".to_string(), "kong".to_string()))
    );
    assert_eq!(
        parse_github_repo("https://github.com/Kong/kong.git"),
        Some(("Kong".to_string(), "kong".to_string()))
    );
    assert_eq!(
        parse_github_repo("https://github.com/Kong/kong/tree/master"),
        Some(("Kong".to_string(), "kong".to_string()))
    );
}

#[test]
fn test_parse_github_repo_rejects_non_repo_urls() {
    assert_eq!(parse_github_repo(""), None);
    assert_eq!(parse_github_repo("https://gitlab.com/a/b"), None);
    assert_eq!(parse_github_repo("https://github.com/onlyowner"), None);
}

// --- lookup ---

#[test]
fn test_non_github_url_returns_default_without_provider_call() {
    let dir = tempfile::tempdir().unwrap();
    let (mut cache, calls) = open_cache(&dir, vec![Ok(meta(10, "x"))]);

    assert_eq!(cache.lookup("https://example.com/tool"), RepoMeta::default());
    assert_eq!(cache.lookup(""), RepoMeta::default());
    assert_eq!(calls.get(), 0);
    assert!(!dir.path().join("github_cache.json").exists());
}

#[test]
fn test_successful_lookup_memoizes_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (mut cache, calls) = open_cache(&dir, vec![Ok(meta(7000, "kong"))]);

    let url = "https://github.com/Kong/kong";
    let first = cache.lookup(url);
    assert_eq!(first.stars, 7000);
    // Repeat lookups within the run never re-issue the external call.
    assert_eq!(cache.lookup(url), first);
    assert_eq!(calls.get(), 1);

    // Persisted durably: a fresh cache instance answers without any call.
    let (mut reopened, reopened_calls) = open_cache(&dir, vec![]);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.lookup(url), first);
    assert_eq!(reopened_calls.get(), 0);
}

#[test]
fn test_rate_limit_exhaustion_returns_default_and_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let script = (0..4).map(|_| Err(ProviderError::RateLimited)).collect();
    let (mut cache, calls) = open_cache(&dir, script);

    let url = "https://github.com/busy/repo";
    assert_eq!(cache.lookup(url), RepoMeta::default());
    // One initial attempt plus MAX_RETRIES retries, then gives up.
    assert_eq!(calls.get(), 4);

    // The failure is memoized for this run only.
    assert_eq!(cache.lookup(url), RepoMeta::default());
    assert_eq!(calls.get(), 4);
    // No negative result is written durably, so the next run retries.
    assert!(!dir.path().join("github_cache.json").exists());
}

#[test]
fn test_transient_failure_then_success_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![
        Err(ProviderError::Timeout(Duration::from_secs(30))),
        Err(ProviderError::Malformed("unexpected EOF".into())),
        Ok(meta(12000, "istio")),
    ];
    let (mut cache, calls) = open_cache(&dir, script);

    let found = cache.lookup("https://github.com/istio/istio");
    assert_eq!(found.stars, 12000);
    assert_eq!(calls.get(), 3);
    assert!(dir.path().join("github_cache.json").exists());
}

#[test]
fn test_nontransient_failure_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![Err(ProviderError::Unavailable("no such repo".into()))];
    let (mut cache, calls) = open_cache(&dir, script);

    assert_eq!(cache.lookup("https://github.com/gone/gone"), RepoMeta::default());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_corrupt_cache_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("github_cache.json"), "{not json").unwrap();

    let (mut cache, calls) = open_cache(&dir, vec![Ok(meta(5, "t"))]);
    assert!(cache.is_empty());
    assert_eq!(cache.lookup("https://github.com/t/t").stars, 5);
    assert_eq!(calls.get(), 1);
}

// --- backoff bounds ---

#[test]
fn test_backoff_delays_double_and_cap_at_300s() {
    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_secs(100),
        max_delay: Duration::from_secs(300),
    };
    assert_eq!(policy.delay_for(1), Duration::from_secs(200));
    assert_eq!(policy.delay_for(2), Duration::from_secs(300));
    assert_eq!(policy.delay_for(3), Duration::from_secs(300));
}

#[test]
fn test_backoff_never_exceeds_cap_for_any_retry_count() {
    let policy = RetryPolicy::default();
    for retry in 0..64 {
        assert!(policy.delay_for(retry) <= Duration::from_secs(300));
    }
}
