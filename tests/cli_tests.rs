//! CLI parsing tests: the skip flag must not swallow the positional DIR.

use clap::Parser;
use std::path::PathBuf;
use toolscout::cli::Cli;

#[test]
fn test_skip_takes_one_stage_per_occurrence() {
    let cli = Cli::try_parse_from(["toolscout", "--skip", "awesome-lists", "out"]).unwrap();
    assert_eq!(cli.skip, ["awesome-lists"]);
    assert_eq!(cli.dir, PathBuf::from("out"));
}

#[test]
fn test_skip_repeats_and_defaults_dir() {
    let cli =
        Cli::try_parse_from(["toolscout", "-s", "github-topics", "-s", "container-hubs"]).unwrap();
    assert_eq!(cli.skip, ["github-topics", "container-hubs"]);
    assert_eq!(cli.dir, PathBuf::from("."));
}
