//! Text-processing helpers shared by the collection sources: category
//! taxonomy, tag extraction, the validity gate, and importance scoring.

use std::collections::BTreeSet;

use crate::types::{Importance, Tool};

/// The known category taxonomy. A record whose category is not listed here
/// fails the validity gate and never reaches the working set.
pub const CATEGORIES: &[&str] = &[
    "API Gateway",
    "API Management",
    "Service Mesh",
    "Version Control",
    "CI/CD",
    "Containers",
    "Monitoring",
    "Logging",
    "Testing",
    "Security",
    "Cost Management",
    "Infrastructure as Code",
    "Developer Experience",
];

/// Tools that are Essential regardless of star count.
const ESSENTIAL_NAMES: &[&str] = &[
    "kubernetes",
    "docker",
    "jenkins",
    "terraform",
    "prometheus",
    "git",
];

/// Keyword → category table used by [`determine_category`]. First hit wins,
/// so more specific keywords come first.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("api-gateway", "API Gateway"),
    ("api gateway", "API Gateway"),
    ("api-management", "API Management"),
    ("api management", "API Management"),
    ("openapi", "API Management"),
    ("swagger", "API Management"),
    ("service-mesh", "Service Mesh"),
    ("service mesh", "Service Mesh"),
    ("sidecar", "Service Mesh"),
    ("version control", "Version Control"),
    ("version-control", "Version Control"),
    ("git", "Version Control"),
    ("continuous integration", "CI/CD"),
    ("continuous delivery", "CI/CD"),
    ("ci/cd", "CI/CD"),
    ("cicd", "CI/CD"),
    ("container", "Containers"),
    ("docker", "Containers"),
    ("kubernetes", "Containers"),
    ("monitoring", "Monitoring"),
    ("observability", "Monitoring"),
    ("metrics", "Monitoring"),
    ("logging", "Logging"),
    ("log management", "Logging"),
    ("testing", "Testing"),
    ("test framework", "Testing"),
    ("security", "Security"),
    ("vulnerability", "Security"),
    ("cost", "Cost Management"),
    ("infrastructure as code", "Infrastructure as Code"),
    ("provisioning", "Infrastructure as Code"),
];

/// Collapse all runs of whitespace to single spaces and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify a tool from its name, description, and topics. Topics are the
/// strongest signal and are checked first. Returns None when nothing matches;
/// callers fall back to the category their stage was collecting for.
pub fn determine_category(name: &str, description: &str, topics: &BTreeSet<String>) -> Option<&'static str> {
    for topic in topics {
        let topic = topic.to_lowercase();
        for (keyword, category) in CATEGORY_KEYWORDS {
            if topic.contains(keyword) {
                return Some(category);
            }
        }
    }
    let haystack = format!("{} {}", name, description).to_lowercase();
    for (keyword, category) in CATEGORY_KEYWORDS {
        if haystack.contains(keyword) {
            return Some(category);
        }
    }
    None
}

/// Derive searchable tags from a tool's topics plus keyword hits in its name
/// and description.
pub fn extract_tags(name: &str, description: &str, topics: &BTreeSet<String>) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = topics.iter().map(|t| t.to_lowercase()).collect();
    let haystack = format!("{} {}", name, description).to_lowercase();
    for keyword in [
        "api", "gateway", "proxy", "mesh", "git", "kubernetes", "docker", "serverless",
        "graphql", "grpc", "rest", "cli", "self-hosted", "cloud-native",
    ] {
        if haystack.contains(keyword) {
            tags.insert(keyword.to_string());
        }
    }
    tags
}

/// Validity gate applied by every source before a record may be folded into
/// the working set: a name, a recognized category, and at least one URL.
pub fn is_valid_tool(tool: &Tool) -> bool {
    !tool.name.is_empty()
        && CATEGORIES.contains(&tool.category.as_str())
        && (!tool.url.is_empty() || !tool.github_url.is_empty())
}

/// Default importance rule: well-known names are Essential outright;
/// otherwise `stars > 10000 ⇒ Essential`, `stars > 5000 ⇒ Recommended`.
pub fn determine_importance(name: &str, stars: u64) -> Importance {
    if ESSENTIAL_NAMES.contains(&name.to_lowercase().as_str()) || stars > 10_000 {
        Importance::Essential
    } else if stars > 5_000 {
        Importance::Recommended
    } else {
        Importance::Optional
    }
}

/// Importance rule for curated sources (landscape, awesome lists), where
/// inclusion already signals quality: `>= 5000 ⇒ Essential`,
/// `>= 1000 ⇒ Recommended`. Monotonic in stars, like the default rule.
pub fn curated_importance(stars: u64) -> Importance {
    if stars >= 5_000 {
        Importance::Essential
    } else if stars >= 1_000 {
        Importance::Recommended
    } else {
        Importance::Optional
    }
}
