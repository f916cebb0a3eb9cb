//! Logging setup: env_logger with a compact colored format. The HTTP stack
//! stays at warn even in verbose mode; backoff waits and stage progress come
//! from this crate's own messages.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        // Connection-level chatter from the client stack would drown the
        // stage progress lines at -v.
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .format(|buf, record| {
            let prefix = env!("CARGO_PKG_NAME").cyan();
            match record.level() {
                Level::Error => writeln!(buf, "[{prefix} {}] {}", "ERROR".red(), record.args()),
                Level::Warn => writeln!(buf, "[{prefix} {}] {}", "WARN".yellow(), record.args()),
                Level::Info => writeln!(buf, "[{prefix}] {}", record.args()),
                Level::Debug | Level::Trace => {
                    writeln!(buf, "[{prefix} {}] {}", record.target().white(), record.args())
                }
            }
        })
        .init();
}
