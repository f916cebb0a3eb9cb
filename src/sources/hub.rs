//! Container and chart hub stage: Docker Hub image search and ArtifactHub
//! package search. Hub star counts run far lower than GitHub's, so this
//! stage has its own modest importance thresholds; ArtifactHub packages
//! that link a GitHub repository are additionally enriched through the
//! metadata cache.

use anyhow::Result;
use log::{debug, warn};
use serde::Deserialize;

use crate::classify::{clean_text, determine_importance, extract_tags, is_valid_tool};
use crate::sources::{Source, SourceContext, http_client};
use crate::types::{Importance, RepoMeta, Tool};
use crate::utils::config::{HUB_RESULT_LIMIT, HUB_SEARCH_SIZE};

/// Categories searched on both hubs; the search term is the kebab-cased
/// category name.
const HUB_CATEGORIES: &[&str] = &[
    "API Gateway",
    "API Management",
    "Service Mesh",
    "Version Control",
];

/// Docker Hub stars needed before an image counts as Recommended.
const DOCKER_RECOMMENDED_STARS: u64 = 100;
/// ArtifactHub stars needed before a package counts as Recommended.
const ARTIFACT_RECOMMENDED_STARS: u64 = 50;

/// Hub-star importance rule: hubs never mint an Essential on their own.
fn hub_importance(stars: u64, recommended_at: u64) -> Importance {
    if stars > recommended_at {
        Importance::Recommended
    } else {
        Importance::Optional
    }
}

/// "helm" -> "Helm"; used for the language field.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Default)]
pub struct HubSource;

#[derive(Deserialize, Default)]
#[serde(default)]
struct DockerSearch {
    results: Vec<DockerImage>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DockerImage {
    name: String,
    description: String,
    repo_name: String,
    star_count: u64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ArtifactSearch {
    packages: Vec<ArtifactPackage>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ArtifactPackage {
    name: String,
    description: String,
    stars: u64,
    repository: ArtifactRepository,
    links: Vec<ArtifactLink>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ArtifactRepository {
    kind: String,
    name: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ArtifactLink {
    url: String,
}

impl HubSource {
    fn collect_docker(
        &self,
        client: &reqwest::blocking::Client,
        category: &str,
        term: &str,
        tools: &mut Vec<Tool>,
    ) {
        let url = format!(
            "https://hub.docker.com/v2/search/repositories/?query={term}&page_size={HUB_SEARCH_SIZE}"
        );
        let search: DockerSearch = match client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
        {
            Ok(search) => search,
            Err(e) => {
                warn!("docker hub query {term} failed: {e}");
                return;
            }
        };
        for image in search.results.into_iter().take(HUB_RESULT_LIMIT) {
            if image.name.is_empty() || image.description.is_empty() {
                continue;
            }
            let name = clean_text(&image.name);
            let description = clean_text(&image.description);
            let topics = ["docker".to_string(), term.to_string()].into();
            let tool = Tool {
                importance: hub_importance(image.star_count, DOCKER_RECOMMENDED_STARS),
                category: category.to_string(),
                tags: extract_tags(&name, &description, &topics),
                url: format!("https://hub.docker.com/r/{}", image.repo_name),
                stars: image.star_count,
                language: "Docker".to_string(),
                name,
                description,
                topics,
                ..Tool::default()
            };
            if is_valid_tool(&tool) {
                debug!("docker hub tool: {} ({category})", tool.name);
                tools.push(tool);
            }
        }
    }

    fn collect_artifacthub(
        &self,
        ctx: &mut SourceContext,
        client: &reqwest::blocking::Client,
        category: &str,
        term: &str,
        tools: &mut Vec<Tool>,
    ) {
        let url = format!(
            "https://artifacthub.io/api/v1/packages/search?kind=0&ts_query_web={term}&limit={HUB_SEARCH_SIZE}"
        );
        let search: ArtifactSearch = match client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
        {
            Ok(search) => search,
            Err(e) => {
                warn!("artifacthub query {term} failed: {e}");
                return;
            }
        };
        for pkg in search.packages.into_iter().take(HUB_RESULT_LIMIT) {
            if pkg.name.is_empty() || pkg.description.is_empty() {
                continue;
            }
            let github_url = pkg
                .links
                .iter()
                .map(|l| l.url.as_str())
                .find(|u| u.contains("github.com"))
                .unwrap_or("")
                .to_string();
            let meta = if github_url.is_empty() {
                RepoMeta::default()
            } else {
                ctx.cache.lookup(&github_url)
            };
            let name = clean_text(&pkg.name);
            let description = clean_text(&pkg.description);
            let kind = if pkg.repository.kind.is_empty() {
                "helm"
            } else {
                pkg.repository.kind.as_str()
            };
            let topics = [kind.to_string(), term.to_string()].into();
            let tool = Tool {
                // Hub stars and GitHub stars are different scales; take the
                // stronger verdict of the two rules (both monotonic).
                importance: determine_importance(&name, meta.stars)
                    .max(hub_importance(pkg.stars, ARTIFACT_RECOMMENDED_STARS)),
                category: category.to_string(),
                tags: extract_tags(&name, &description, &topics),
                url: format!(
                    "https://artifacthub.io/packages/{kind}/{}/{}",
                    pkg.repository.name, pkg.name
                ),
                stars: pkg.stars.max(meta.stars),
                is_open_source: meta.is_open_source,
                language: capitalize(kind),
                github_url,
                name,
                description,
                topics,
                ..Tool::default()
            };
            if is_valid_tool(&tool) {
                debug!("artifacthub tool: {} ({category})", tool.name);
                tools.push(tool);
            }
            ctx.throttle.pause();
        }
    }
}

impl Source for HubSource {
    fn name(&self) -> &'static str {
        "container-hubs"
    }

    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>> {
        let client = http_client()?;
        let mut tools = Vec::new();
        for category in HUB_CATEGORIES {
            let term = category.to_lowercase().replace(' ', "-");
            self.collect_docker(&client, category, &term, &mut tools);
            ctx.throttle.pause();
            self.collect_artifacthub(ctx, &client, category, &term, &mut tools);
            ctx.throttle.pause();
        }
        Ok(tools)
    }
}
