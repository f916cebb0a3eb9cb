//! Curated awesome-list stage: fetch raw list READMEs, pull out the GitHub
//! repository links, and enrich each one through the metadata cache. Least
//! structured of the sources, so it runs last and mostly fills gaps.

use anyhow::Result;
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::classify::{clean_text, curated_importance, extract_tags, is_valid_tool};
use crate::sources::{Source, SourceContext, http_client};
use crate::types::Tool;

/// Raw README URLs per category.
const AWESOME_LISTS: &[(&str, &[&str])] = &[
    (
        "API Gateway",
        &[
            "https://raw.githubusercontent.com/yosriady/awesome-api-gateway/master/README.md",
            "https://raw.githubusercontent.com/svenwal/awesome-api-gateways/master/README.md",
        ],
    ),
    (
        "API Management",
        &[
            "https://raw.githubusercontent.com/mailtoharshit/awesome-api/master/README.md",
            "https://raw.githubusercontent.com/APIs-guru/awesome-openapi3/master/README.md",
        ],
    ),
    (
        "Version Control",
        &["https://raw.githubusercontent.com/stevemao/awesome-git-addons/master/README.md"],
    ),
    (
        "Service Mesh",
        &["https://raw.githubusercontent.com/servicemesher/awesome-servicemesh/master/README.md"],
    ),
];

fn github_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+").expect("valid regex")
    })
}

#[derive(Default)]
pub struct AwesomeListSource;

impl Source for AwesomeListSource {
    fn name(&self) -> &'static str {
        "awesome-lists"
    }

    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>> {
        let client = http_client()?;
        let mut tools = Vec::new();

        for (category, urls) in AWESOME_LISTS {
            for list_url in *urls {
                let content = match client
                    .get(*list_url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .and_then(|r| r.text())
                {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("could not fetch awesome list {list_url}: {e}");
                        continue;
                    }
                };

                // Dedup within the list; the same repo is often linked twice.
                let links: BTreeSet<&str> = github_link_re()
                    .find_iter(&content)
                    .map(|m| m.as_str())
                    .collect();

                for link in links {
                    let meta = ctx.cache.lookup(link);
                    if !meta.is_open_source {
                        continue;
                    }
                    let name = if meta.name.is_empty() {
                        link.rsplit('/').next().unwrap_or_default().to_string()
                    } else {
                        meta.name.clone()
                    };
                    let description = clean_text(&meta.description);
                    let topics = Default::default();
                    let tool = Tool {
                        importance: curated_importance(meta.stars),
                        category: (*category).to_string(),
                        tags: extract_tags(&name, &description, &topics),
                        github_url: link.to_string(),
                        stars: meta.stars,
                        is_open_source: meta.is_open_source,
                        name,
                        description,
                        topics,
                        ..Tool::default()
                    };
                    if is_valid_tool(&tool) {
                        debug!("awesome-list tool: {} ({category})", tool.name);
                        tools.push(tool);
                    }
                    ctx.throttle.pause();
                }
            }
        }
        Ok(tools)
    }
}
