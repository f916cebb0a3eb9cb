//! Toolscout: incremental developer-tool catalog aggregator.
//!
//! Collects tool metadata from the CNCF landscape, GitHub topic search,
//! package registries, and curated awesome lists; dedupes records across
//! sources and checkpoints the working set after every stage so a long run
//! can be interrupted and resumed.

pub mod cache;
pub mod checkpoint;
pub mod classify;
pub mod cli;
pub mod merge;
pub mod pipeline;
pub mod provider;
pub mod sources;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;

/// Result alias used by public toolscout API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

use crate::cache::{MetadataCache, RetryPolicy};
use crate::checkpoint::CheckpointStore;
use crate::pipeline::Collector;
use crate::provider::GhCliProvider;
use crate::sources::{SourceContext, default_sources};
use crate::utils::Throttle;
use crate::utils::config::{CatalogFiles, ThrottleConsts};

/// Single entry point: run the full collection pipeline per `opts` and write
/// catalog, stats, checkpoint, and cache files into `opts.out_dir`.
///
/// Stage failures are logged and skipped; an error return means the initial
/// checkpoint could not be loaded or the final catalog could not be written.
pub fn collect_catalog(opts: &CollectOpts) -> Result<RunSummary> {
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let checkpoint_path = opts
        .checkpoint
        .clone()
        .unwrap_or_else(|| opts.out_dir.join(CatalogFiles::CHECKPOINT));
    let cache_path = opts
        .cache
        .clone()
        .unwrap_or_else(|| opts.out_dir.join(CatalogFiles::CACHE));

    let throttle = Throttle::new(
        std::time::Duration::from_secs(opts.min_delay_secs.unwrap_or(ThrottleConsts::MIN_SLEEP_SECS)),
        std::time::Duration::from_secs(opts.max_delay_secs.unwrap_or(ThrottleConsts::MAX_SLEEP_SECS)),
    );
    let mut ctx = SourceContext {
        cache: MetadataCache::open(
            cache_path,
            Box::new(GhCliProvider::default()),
            RetryPolicy::jittered(),
        ),
        throttle,
    };

    let sources: Vec<_> = default_sources()
        .into_iter()
        .filter(|s| !opts.skip.iter().any(|skip| skip == s.name()))
        .collect();

    let collector = Collector::new(
        CheckpointStore::new(checkpoint_path),
        opts.out_dir.join(CatalogFiles::CATALOG),
        opts.out_dir.join(CatalogFiles::STATS),
    );
    collector.run(&mut ctx, &sources)
}
