//! CNCF landscape stage: fetch `landscape.yml`, walk its category tree, and
//! enrich every GitHub-hosted item through the metadata cache. The most
//! structured source, so it runs first.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

use crate::classify::{clean_text, curated_importance, determine_category, extract_tags, is_valid_tool};
use crate::sources::{Source, SourceContext, http_client};
use crate::types::Tool;

const LANDSCAPE_URL: &str =
    "https://raw.githubusercontent.com/cncf/landscape/master/landscape.yml";

/// Category a landscape item falls back to when keyword classification finds
/// nothing better.
const FALLBACK_CATEGORY: &str = "Developer Experience";

pub struct LandscapeSource {
    url: String,
}

impl Default for LandscapeSource {
    fn default() -> Self {
        Self {
            url: LANDSCAPE_URL.to_string(),
        }
    }
}

impl LandscapeSource {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Landscape {
    landscape: Vec<LandscapeCategory>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LandscapeCategory {
    name: String,
    subcategories: Vec<LandscapeSubcategory>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LandscapeSubcategory {
    name: String,
    items: Vec<LandscapeItem>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LandscapeItem {
    name: String,
    homepage_url: String,
    repo_url: String,
    description: String,
}

impl Source for LandscapeSource {
    fn name(&self) -> &'static str {
        "cncf-landscape"
    }

    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>> {
        let client = http_client()?;
        let body = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .with_context(|| format!("fetching landscape from {}", self.url))?;
        let doc: Landscape =
            serde_yaml::from_str(&body).context("parsing landscape.yml")?;

        let mut tools = Vec::new();
        for category in &doc.landscape {
            for subcategory in &category.subcategories {
                debug!("scanning landscape: {} / {}", category.name, subcategory.name);
                for item in &subcategory.items {
                    if item.repo_url.is_empty() || !item.repo_url.contains("github.com") {
                        continue;
                    }
                    let meta = ctx.cache.lookup(&item.repo_url);
                    if !meta.is_open_source {
                        debug!("skipping private repo {}", item.repo_url);
                        continue;
                    }
                    let name = if item.name.is_empty() {
                        meta.name.clone()
                    } else {
                        item.name.clone()
                    };
                    let description = if item.description.is_empty() {
                        clean_text(&meta.description)
                    } else {
                        clean_text(&item.description)
                    };
                    let topics = Default::default();
                    let tool = Tool {
                        category: determine_category(&name, &description, &topics)
                            .unwrap_or(FALLBACK_CATEGORY)
                            .to_string(),
                        importance: curated_importance(meta.stars),
                        tags: extract_tags(&name, &description, &topics),
                        url: if item.homepage_url.is_empty() {
                            item.repo_url.clone()
                        } else {
                            item.homepage_url.clone()
                        },
                        github_url: item.repo_url.clone(),
                        stars: meta.stars,
                        is_open_source: meta.is_open_source,
                        name,
                        description,
                        topics,
                        ..Tool::default()
                    };
                    if is_valid_tool(&tool) {
                        debug!("landscape tool: {} ({})", tool.name, tool.category);
                        tools.push(tool);
                    } else {
                        warn!("dropping invalid landscape item {:?}", item.name);
                    }
                    ctx.throttle.pause();
                }
            }
        }
        Ok(tools)
    }
}
