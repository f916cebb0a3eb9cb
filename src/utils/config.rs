//! Application configuration constants.
//! Filenames, retry bounds, and throttling defaults in one place.

// ---- Persisted files ----

/// Default filenames for the persisted JSON files, relative to the output
/// directory. All four are pretty-printed UTF-8 JSON.
pub struct CatalogFiles;

impl CatalogFiles {
    /// Working set as of the last completed stage (array of Tool).
    pub const CHECKPOINT: &'static str = "tools_checkpoint.json";
    /// Repository-metadata cache (map of URL → RepoMeta).
    pub const CACHE: &'static str = "github_cache.json";
    /// Finalized deduplicated catalog (array of Tool).
    pub const CATALOG: &'static str = "tools.json";
    /// Per-category counts over the finalized catalog.
    pub const STATS: &'static str = "category_stats.json";
}

// ---- Retry / backoff ----

/// Bounds for the provider retry loop in the metadata cache.
pub struct RetryConsts;

impl RetryConsts {
    /// Retries after the initial attempt, per lookup.
    pub const MAX_RETRIES: u32 = 3;
    /// Backoff base when not jittered (jittered default samples 1–3 s).
    pub const BASE_DELAY: std::time::Duration = std::time::Duration::from_secs(2);
    /// Hard cap on any single backoff delay.
    pub const BACKOFF_CAP: std::time::Duration = std::time::Duration::from_secs(300);
    /// Timeout for one provider call.
    pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
}

// ---- Request throttling ----

/// Default randomized delay between successive external calls, in seconds.
pub struct ThrottleConsts;

impl ThrottleConsts {
    pub const MIN_SLEEP_SECS: u64 = 1;
    pub const MAX_SLEEP_SECS: u64 = 3;
}

// ---- Search ----

/// Page size for GitHub topic search queries.
pub const SEARCH_PAGE_SIZE: usize = 100;

/// Page size for npm registry search queries.
pub const NPM_SEARCH_SIZE: usize = 25;

/// Page size for Docker Hub and ArtifactHub search queries.
pub const HUB_SEARCH_SIZE: usize = 25;

/// Results kept per hub query after ranking.
pub const HUB_RESULT_LIMIT: usize = 10;
