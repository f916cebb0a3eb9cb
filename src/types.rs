//! Public types for the toolscout API and pipeline.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Importance tier of a tool. Ordered so that `max` picks the stronger tier
/// when two records for the same tool are merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Importance {
    #[default]
    Optional,
    Recommended,
    Essential,
}

/// One catalog entry describing a discovered tool.
///
/// Serialized with camelCase field names; this is the exact shape of the
/// checkpoint and catalog files. Empty string means the field is unknown
/// (`url`, `documentation_url`, `github_url`, `language`), which lets a later
/// source fill it in during a merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub category: String,
    pub importance: Importance,
    pub is_open_source: bool,
    pub url: String,
    pub documentation_url: String,
    pub github_url: String,
    pub stars: u64,
    pub language: String,
    pub topics: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            importance: Importance::default(),
            is_open_source: true,
            url: String::new(),
            documentation_url: String::new(),
            github_url: String::new(),
            stars: 0,
            language: String::new(),
            topics: BTreeSet::new(),
            tags: BTreeSet::new(),
        }
    }
}

impl Tool {
    /// Dedup key: `(lowercase(name), url, github_url)`. Empty components
    /// participate in equality, so two records that both lack a URL still
    /// compare equal when name and GitHub URL match.
    pub fn identity(&self) -> ToolKey {
        ToolKey {
            name: self.name.to_lowercase(),
            url: self.url.clone(),
            github_url: self.github_url.clone(),
        }
    }
}

/// Identity key used to detect duplicate records across sources.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ToolKey {
    pub name: String,
    pub url: String,
    pub github_url: String,
}

/// Repository metadata cached per URL. Value type of the durable cache file
/// (map of repository URL → `RepoMeta`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoMeta {
    pub stars: u64,
    pub description: String,
    pub is_open_source: bool,
    pub name: String,
}

impl Default for RepoMeta {
    fn default() -> Self {
        Self {
            stars: 0,
            description: String::new(),
            is_open_source: true,
            name: String::new(),
        }
    }
}

/// Outcome of a full collection run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// (stage name, records collected) per completed stage, in run order.
    pub stage_counts: Vec<(String, usize)>,
    /// Names of stages that failed and were skipped.
    pub failed_stages: Vec<String>,
    /// Unique tools in the finalized catalog.
    pub total: usize,
    /// Per-category counts over the finalized catalog.
    pub categories: BTreeMap<String, usize>,
}

/// Options for [`collect_catalog`](crate::collect_catalog).
#[derive(Clone, Debug, Default)]
pub struct CollectOpts {
    /// Directory for catalog, stats, checkpoint, and cache files.
    pub out_dir: PathBuf,
    /// Checkpoint file path. When None, uses the default filename in `out_dir`.
    pub checkpoint: Option<PathBuf>,
    /// Cache file path. When None, uses the default filename in `out_dir`.
    pub cache: Option<PathBuf>,
    /// Minimum randomized delay between external calls, in seconds.
    pub min_delay_secs: Option<u64>,
    /// Maximum randomized delay between external calls, in seconds.
    pub max_delay_secs: Option<u64>,
    /// Stage names to skip (see [`default_sources`](crate::sources::default_sources)).
    pub skip: Vec<String>,
    /// Verbose output.
    pub verbose: bool,
}
