//! Repository-info providers: the seam between the metadata cache and the
//! outside world. The production provider shells out to the `gh` CLI; tests
//! substitute scripted fakes.

use serde::Deserialize;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::types::RepoMeta;
use crate::utils::config::RetryConsts;

/// How a provider call failed. Transient variants are retried with backoff;
/// `Unavailable` (repo gone, CLI missing, non-rate-limit API error) is not.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

/// Fetches metadata for one repository. Implementations block the calling
/// thread; the cache layers retry and memoization on top.
pub trait RepoInfoProvider {
    fn fetch(&self, owner: &str, repo: &str) -> Result<RepoMeta, ProviderError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GhRepoView {
    stargazer_count: u64,
    description: Option<String>,
    is_private: bool,
    name: String,
}

impl Default for GhRepoView {
    fn default() -> Self {
        Self {
            stargazer_count: 0,
            description: None,
            is_private: false,
            name: String::new(),
        }
    }
}

/// Provider backed by `gh repo view --json`, the authenticated GitHub CLI.
pub struct GhCliProvider {
    timeout: Duration,
}

impl Default for GhCliProvider {
    fn default() -> Self {
        Self {
            timeout: RetryConsts::REQUEST_TIMEOUT,
        }
    }
}

impl GhCliProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Poll interval while waiting on the `gh` child process.
const CHILD_POLL: Duration = Duration::from_millis(100);

impl RepoInfoProvider for GhCliProvider {
    fn fetch(&self, owner: &str, repo: &str) -> Result<RepoMeta, ProviderError> {
        let mut child = Command::new("gh")
            .args([
                "repo",
                "view",
                &format!("{owner}/{repo}"),
                "--json",
                "stargazerCount,description,isPrivate,name",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProviderError::Unavailable(format!("failed to spawn gh: {e}")))?;

        // gh output fits well under the pipe buffer, so polling before
        // reading cannot deadlock.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ProviderError::Timeout(self.timeout));
                    }
                    std::thread::sleep(CHILD_POLL);
                }
                Err(e) => {
                    return Err(ProviderError::Unavailable(format!("failed to wait on gh: {e}")));
                }
            }
        };

        let mut stdout = String::new();
        if let Some(mut out) = child.stdout.take() {
            let _ = out.read_to_string(&mut stdout);
        }
        let mut stderr = String::new();
        if let Some(mut err) = child.stderr.take() {
            let _ = err.read_to_string(&mut stderr);
        }

        if !status.success() {
            if stderr.to_lowercase().contains("rate limit") {
                return Err(ProviderError::RateLimited);
            }
            return Err(ProviderError::Unavailable(format!(
                "gh repo view {owner}/{repo} failed: {}",
                stderr.trim()
            )));
        }

        let view: GhRepoView =
            serde_json::from_str(&stdout).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(RepoMeta {
            stars: view.stargazer_count,
            description: view.description.unwrap_or_default(),
            is_open_source: !view.is_private,
            name: if view.name.is_empty() {
                repo.to_string()
            } else {
                view.name
            },
        })
    }
}
