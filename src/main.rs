//! Toolscout CLI: collect the developer-tool catalog incrementally.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use toolscout::cli::{Cli, handle_run};

fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();
    let summary = handle_run(&cli)?;

    for (stage, count) in &summary.stage_counts {
        log::debug!("stage {stage}: {count} records");
    }
    for stage in &summary.failed_stages {
        log::warn!("stage {stage} failed; its records will be picked up on a later run");
    }
    log::info!(
        "collection finished: {} unique tools across {} categories in {:.1?}",
        summary.total,
        summary.categories.len(),
        started.elapsed()
    );
    Ok(())
}
