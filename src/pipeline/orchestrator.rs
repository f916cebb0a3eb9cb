//! Main orchestrator: run the collection stages in a fixed order, fold each
//! stage's output into the working set, and checkpoint after every stage so a
//! killed process loses at most the in-flight stage.
//!
//! Failure semantics: a stage that errors is logged and skipped; the run
//! continues from the last checkpointed working set. Only the initial
//! checkpoint load and the finalization writes are fatal.

use anyhow::{Context, Result};
use log::{error, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::checkpoint::CheckpointStore;
use crate::merge::ToolSet;
use crate::sources::{Source, SourceContext};
use crate::types::{RunSummary, Tool};

pub struct Collector {
    checkpoint: CheckpointStore,
    catalog_path: PathBuf,
    stats_path: PathBuf,
}

impl Collector {
    pub fn new(checkpoint: CheckpointStore, catalog_path: PathBuf, stats_path: PathBuf) -> Self {
        Self {
            checkpoint,
            catalog_path,
            stats_path,
        }
    }

    /// Run every stage in order and finalize the catalog. Returns the run
    /// summary; errors only on a failed initial checkpoint load or a failed
    /// finalization write.
    pub fn run(&self, ctx: &mut SourceContext, sources: &[Box<dyn Source>]) -> Result<RunSummary> {
        let mut set = ToolSet::new();
        let resumed = self
            .checkpoint
            .load()
            .context("loading initial checkpoint")?;
        if !resumed.is_empty() {
            info!("loaded {} tools from checkpoint", resumed.len());
        }
        set.fold(resumed);

        let mut summary = RunSummary::default();
        for source in sources {
            info!("collecting tools from {}...", source.name());
            match source.collect(ctx) {
                Ok(tools) => {
                    let collected = tools.len();
                    set.fold(tools);
                    info!(
                        "collected {collected} tools from {} ({} unique so far)",
                        source.name(),
                        set.len()
                    );
                    summary
                        .stage_counts
                        .push((source.name().to_string(), collected));
                    self.checkpoint.save(set.as_slice());
                }
                Err(e) => {
                    error!(
                        "stage {} failed: {e:#}; continuing with remaining sources",
                        source.name()
                    );
                    summary.failed_stages.push(source.name().to_string());
                }
            }
        }

        let tools = set.into_vec();
        summary.total = tools.len();
        summary.categories = category_counts(&tools);
        self.finalize(&tools, &summary.categories)?;
        Ok(summary)
    }

    /// Write the final catalog and category statistics. Failing here makes
    /// the whole run meaningless, so errors propagate.
    fn finalize(&self, tools: &[Tool], categories: &BTreeMap<String, usize>) -> Result<()> {
        info!("total unique tools collected: {}", tools.len());
        for (category, count) in categories {
            info!("{category}: {count} tools");
        }

        let catalog = serde_json::to_string_pretty(tools)?;
        fs::write(&self.catalog_path, catalog)
            .with_context(|| format!("writing catalog {}", self.catalog_path.display()))?;

        let stats = serde_json::to_string_pretty(categories)?;
        fs::write(&self.stats_path, stats)
            .with_context(|| format!("writing category stats {}", self.stats_path.display()))?;

        info!(
            "results saved to {} and {}",
            self.catalog_path.display(),
            self.stats_path.display()
        );
        Ok(())
    }
}

/// Per-category counts over a tool list.
pub fn category_counts(tools: &[Tool]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tool in tools {
        *counts.entry(tool.category.clone()).or_insert(0) += 1;
    }
    counts
}
