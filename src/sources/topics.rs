//! GitHub topic search stage: category-specific topic queries through the
//! `gh` search API. Search results carry star counts directly, so this stage
//! needs no cache lookups.

use anyhow::Result;
use log::{debug, info, warn};
use serde::Deserialize;
use std::process::Command;
use std::time::Duration;

use crate::classify::{clean_text, determine_importance, extract_tags, is_valid_tool};
use crate::sources::{Source, SourceContext};
use crate::types::Tool;
use crate::utils::config::SEARCH_PAGE_SIZE;

/// Search terms per category, most specific first.
const TOPIC_QUERIES: &[(&str, &[&str])] = &[
    ("API Gateway", &["api-gateway", "api-proxy", "api-router"]),
    ("API Management", &["api-management", "api-platform", "openapi-tools"]),
    ("Service Mesh", &["service-mesh", "service-proxy", "service-discovery"]),
    ("Version Control", &["version-control-system", "git-server", "version-manager"]),
];

/// Minimum stars for a topic-search hit; filters out one-off experiments.
const MIN_SEARCH_STARS: u32 = 50;

/// Search queries get a simple linear retry (the search endpoint rarely rate
/// limits at this volume; the per-repo backoff lives in the cache).
const SEARCH_MAX_ATTEMPTS: u32 = 3;
const SEARCH_RETRY_STEP: Duration = Duration::from_secs(5);

pub struct TopicSearchSource {
    queries: &'static [(&'static str, &'static [&'static str])],
}

impl Default for TopicSearchSource {
    fn default() -> Self {
        Self {
            queries: TOPIC_QUERIES,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchResponse {
    items: Vec<SearchRepo>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchRepo {
    name: String,
    description: Option<String>,
    stargazers_count: u64,
    html_url: String,
    homepage: Option<String>,
    language: Option<String>,
    topics: Vec<String>,
    archived: bool,
    private: bool,
}

/// Run one search query via `gh api /search/repositories`, retrying a couple
/// of times before giving the query up (a lost query is not fatal to the
/// stage).
fn run_search(query: &str) -> Vec<SearchRepo> {
    info!("running GitHub query: {query}");
    for attempt in 1..=SEARCH_MAX_ATTEMPTS {
        let output = Command::new("gh")
            .args([
                "api",
                "-X",
                "GET",
                "/search/repositories",
                "-f",
                &format!("q={query}"),
                "-f",
                "sort=stars",
                "-f",
                "order=desc",
                "-f",
                &format!("per_page={SEARCH_PAGE_SIZE}"),
            ])
            .output();

        match output {
            Ok(out) if out.status.success() => {
                match serde_json::from_slice::<SearchResponse>(&out.stdout) {
                    Ok(resp) => return resp.items,
                    Err(e) => warn!("unparseable search response for {query}: {e}"),
                }
            }
            Ok(out) => {
                warn!(
                    "search query {query} failed (attempt {attempt}/{SEARCH_MAX_ATTEMPTS}): {}",
                    String::from_utf8_lossy(&out.stderr).trim()
                );
            }
            Err(e) => {
                warn!("could not run gh for {query}: {e}");
                return Vec::new();
            }
        }
        if attempt < SEARCH_MAX_ATTEMPTS {
            std::thread::sleep(SEARCH_RETRY_STEP.saturating_mul(attempt));
        }
    }
    warn!("max retries reached for query {query}, skipping");
    Vec::new()
}

impl Source for TopicSearchSource {
    fn name(&self) -> &'static str {
        "github-topics"
    }

    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>> {
        let mut tools = Vec::new();
        for (category, terms) in self.queries {
            for term in *terms {
                let query = format!("topic:{term} stars:>{MIN_SEARCH_STARS}");
                for repo in run_search(&query) {
                    if repo.archived || repo.private {
                        continue;
                    }
                    let description = clean_text(repo.description.as_deref().unwrap_or(""));
                    let topics = repo.topics.iter().map(|t| t.to_lowercase()).collect();
                    let homepage = repo.homepage.unwrap_or_default();
                    let tool = Tool {
                        importance: determine_importance(&repo.name, repo.stargazers_count),
                        category: (*category).to_string(),
                        tags: extract_tags(&repo.name, &description, &topics),
                        url: if homepage.is_empty() {
                            repo.html_url.clone()
                        } else {
                            homepage
                        },
                        github_url: repo.html_url,
                        stars: repo.stargazers_count,
                        language: repo.language.unwrap_or_default(),
                        name: repo.name,
                        description,
                        topics,
                        ..Tool::default()
                    };
                    if is_valid_tool(&tool) {
                        debug!("topic tool: {} ({category})", tool.name);
                        tools.push(tool);
                    }
                }
                ctx.throttle.pause();
            }
        }
        Ok(tools)
    }
}
