//! Durable checkpointing of the working set between pipeline stages.
//!
//! A checkpoint is the full tool list as of the last completed stage, written
//! pretty-printed so an interrupted multi-hour run resumes where it left off.
//! Corrupt or superseded files are renamed to timestamped backups, never
//! destroyed.

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Tool;

pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the working set from the checkpoint file.
    ///
    /// Missing file → empty set. Corrupt file → renamed to a timestamped
    /// backup for forensic inspection, empty set returned. Only an I/O
    /// failure (unreadable file, failed rename) is an error; the orchestrator
    /// treats that as fatal at the initial load.
    pub fn load(&self) -> Result<Vec<Tool>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading checkpoint {}", self.path.display()));
            }
        };
        match serde_json::from_str(&raw) {
            Ok(tools) => Ok(tools),
            Err(e) => {
                warn!("checkpoint {} failed to parse: {e}", self.path.display());
                let backup = self.backup_path();
                fs::rename(&self.path, &backup).with_context(|| {
                    format!("backing up corrupt checkpoint to {}", backup.display())
                })?;
                info!("backed up corrupt checkpoint to {}", backup.display());
                Ok(Vec::new())
            }
        }
    }

    /// Persist the working set. An existing checkpoint is renamed to a
    /// timestamped backup first, so one prior generation survives each save.
    /// Failures are logged and swallowed: a missed save point only shrinks
    /// how much a crash can resume, it must not abort the run.
    pub fn save(&self, tools: &[Tool]) {
        if let Err(e) = self.try_save(tools) {
            error!("failed to save checkpoint: {e:#}");
        }
    }

    fn try_save(&self, tools: &[Tool]) -> Result<()> {
        if self.path.exists() {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup).with_context(|| {
                format!("backing up previous checkpoint to {}", backup.display())
            })?;
        }
        let json = serde_json::to_string_pretty(tools)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing checkpoint {}", self.path.display()))?;
        info!("saved checkpoint with {} tools", tools.len());
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        PathBuf::from(format!("{}.bak.{secs}", self.path.display()))
    }
}
