//! Command-line interface: argument parsing and the run handler.

use clap::Parser;
use std::path::PathBuf;

use crate::types::{CollectOpts, RunSummary};
use crate::utils::setup_logging;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Incremental developer-tool catalog aggregator.
#[derive(Clone, Parser)]
#[command(name = "toolscout")]
#[command(about = "Collect the developer-tool catalog; resumes from the last checkpoint.")]
pub struct Cli {
    /// Output directory for catalog, stats, checkpoint, and cache files.
    /// Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Path to the checkpoint file. Default: `tools_checkpoint.json` in DIR.
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Path to the repository-metadata cache file. Default: `github_cache.json` in DIR.
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Minimum randomized delay between external requests, in seconds.
    #[arg(long, value_name = "SECS")]
    pub min_delay: Option<u64>,

    /// Maximum randomized delay between external requests, in seconds.
    #[arg(long, value_name = "SECS")]
    pub max_delay: Option<u64>,

    /// Skip a stage by name (cncf-landscape, github-topics, package-registries,
    /// container-hubs, awesome-lists). One stage per occurrence; repeat to
    /// skip several.
    #[arg(long, short = 's', value_name = "STAGE", action = clap::ArgAction::Append)]
    pub skip: Vec<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    fn to_opts(&self) -> CollectOpts {
        CollectOpts {
            out_dir: self.dir.clone(),
            checkpoint: self.checkpoint.clone(),
            cache: self.cache.clone(),
            min_delay_secs: self.min_delay,
            max_delay_secs: self.max_delay,
            skip: self.skip.clone(),
            verbose: self.verbose.unwrap_or(false),
        }
    }
}

/// Handle a collection run: set up logging and run the pipeline. Reporting
/// the summary is the caller's business; the error reflects only fatal
/// failures.
pub fn handle_run(cli: &Cli) -> crate::Result<RunSummary> {
    let opts = cli.to_opts();
    setup_logging(opts.verbose);
    crate::collect_catalog(&opts)
}
