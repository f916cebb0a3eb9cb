//! Package registry stage: npm search and PyPI project lookups. Registry
//! records only become catalog entries when they point at a GitHub
//! repository, which is then enriched through the metadata cache.

use anyhow::Result;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;

use crate::classify::{clean_text, determine_importance, extract_tags, is_valid_tool};
use crate::sources::{Source, SourceContext, http_client};
use crate::types::Tool;
use crate::utils::config::NPM_SEARCH_SIZE;

/// npm search text per category.
const NPM_QUERIES: &[(&str, &[&str])] = &[
    ("API Gateway", &["api-gateway", "gateway-middleware"]),
    ("API Management", &["api-management", "openapi-tools"]),
    ("Service Mesh", &["service-mesh", "envoy-proxy"]),
    ("Version Control", &["git-tools", "git-hooks"]),
];

/// PyPI project names per category (PyPI has no search API; the original
/// probes known project names directly).
const PYPI_QUERIES: &[(&str, &[&str])] = &[
    ("API Gateway", &["fastapi-gateway", "flask-gateway"]),
    ("API Management", &["flask-restx", "openapi-core"]),
    ("Version Control", &["gitpython", "git-tools"]),
];

#[derive(Default)]
pub struct RegistrySource;

#[derive(Deserialize, Default)]
#[serde(default)]
struct NpmSearch {
    objects: Vec<NpmObject>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct NpmObject {
    package: NpmPackage,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct NpmPackage {
    name: String,
    description: Option<String>,
    links: NpmLinks,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct NpmLinks {
    repository: Option<String>,
    homepage: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PypiInfo {
    name: String,
    summary: Option<String>,
    home_page: Option<String>,
    project_urls: Option<HashMap<String, String>>,
}

/// Build a Tool from a registry package that references a GitHub repo.
fn registry_tool(
    ctx: &mut SourceContext,
    name: &str,
    description: &str,
    category: &str,
    homepage: &str,
    repo_url: &str,
    language: &str,
) -> Tool {
    let meta = ctx.cache.lookup(repo_url);
    let description = if description.is_empty() {
        clean_text(&meta.description)
    } else {
        clean_text(description)
    };
    let topics = Default::default();
    Tool {
        importance: determine_importance(name, meta.stars),
        category: category.to_string(),
        tags: extract_tags(name, &description, &topics),
        url: homepage.to_string(),
        github_url: repo_url.to_string(),
        stars: meta.stars,
        is_open_source: meta.is_open_source,
        language: language.to_string(),
        name: name.to_string(),
        description,
        topics,
        ..Tool::default()
    }
}

impl Source for RegistrySource {
    fn name(&self) -> &'static str {
        "package-registries"
    }

    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>> {
        let client = http_client()?;
        let mut tools = Vec::new();

        for (category, queries) in NPM_QUERIES {
            for query in *queries {
                let url = format!(
                    "https://registry.npmjs.org/-/v1/search?text={query}&size={NPM_SEARCH_SIZE}"
                );
                let search: NpmSearch = match client
                    .get(&url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .and_then(|r| r.json())
                {
                    Ok(search) => search,
                    Err(e) => {
                        warn!("npm query {query} failed: {e}");
                        continue;
                    }
                };
                for object in search.objects {
                    let pkg = object.package;
                    let Some(repo) = pkg.links.repository.filter(|r| r.contains("github.com"))
                    else {
                        continue;
                    };
                    let tool = registry_tool(
                        ctx,
                        &pkg.name,
                        pkg.description.as_deref().unwrap_or(""),
                        category,
                        pkg.links.homepage.as_deref().unwrap_or(""),
                        &repo,
                        "JavaScript",
                    );
                    if is_valid_tool(&tool) {
                        debug!("npm tool: {} ({category})", tool.name);
                        tools.push(tool);
                    }
                }
                ctx.throttle.pause();
            }
        }

        for (category, projects) in PYPI_QUERIES {
            for project in *projects {
                let url = format!("https://pypi.org/pypi/{project}/json");
                let resp: PypiResponse = match client
                    .get(&url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .and_then(|r| r.json())
                {
                    Ok(resp) => resp,
                    Err(e) => {
                        warn!("pypi lookup {project} failed: {e}");
                        continue;
                    }
                };
                let info = resp.info;
                let Some(source) = info
                    .project_urls
                    .as_ref()
                    .and_then(|urls| urls.get("Source"))
                    .filter(|u| u.contains("github.com"))
                else {
                    continue;
                };
                let source = source.clone();
                let tool = registry_tool(
                    ctx,
                    &info.name,
                    info.summary.as_deref().unwrap_or(""),
                    category,
                    info.home_page.as_deref().unwrap_or(""),
                    &source,
                    "Python",
                );
                if is_valid_tool(&tool) {
                    debug!("pypi tool: {} ({category})", tool.name);
                    tools.push(tool);
                }
                ctx.throttle.pause();
            }
        }

        Ok(tools)
    }
}
