//! Classification helper tests: validity gate, importance thresholds, and
//! text normalization.

use std::collections::BTreeSet;
use toolscout::classify::{
    clean_text, curated_importance, determine_category, determine_importance, extract_tags,
    is_valid_tool,
};
use toolscout::{Importance, Tool};

// --- clean_text ---

#[test]
fn test_clean_text_collapses_whitespace() {
    assert_eq!(clean_text("  a \t b\n\nc  "), "a b c");
    assert_eq!(clean_text(""), "");
}

// --- validity gate ---

#[test]
fn test_is_valid_tool_requires_name_category_and_url() {
    let valid = Tool {
        name: "kong".to_string(),
        category: "API Gateway".to_string(),
        github_url: "https://github.com/Kong/kong".to_string(),
        ..Tool::default()
    };
    assert!(is_valid_tool(&valid));

    let mut no_name = valid.clone();
    no_name.name.clear();
    assert!(!is_valid_tool(&no_name));

    let mut bad_category = valid.clone();
    bad_category.category = "Esoterica".to_string();
    assert!(!is_valid_tool(&bad_category));

    let mut no_urls = valid.clone();
    no_urls.github_url.clear();
    assert!(!is_valid_tool(&no_urls));

    // A homepage alone is enough.
    no_urls.url = "https://konghq.com".to_string();
    assert!(is_valid_tool(&no_urls));
}

// --- importance ---

#[test]
fn test_determine_importance_thresholds_monotonic() {
    assert_eq!(determine_importance("some-tool", 0), Importance::Optional);
    assert_eq!(determine_importance("some-tool", 5_000), Importance::Optional);
    assert_eq!(determine_importance("some-tool", 5_001), Importance::Recommended);
    assert_eq!(determine_importance("some-tool", 10_001), Importance::Essential);
}

#[test]
fn test_determine_importance_allow_list_overrides_stars() {
    assert_eq!(determine_importance("Kubernetes", 0), Importance::Essential);
    assert_eq!(determine_importance("git", 12), Importance::Essential);
}

#[test]
fn test_curated_importance_uses_lower_thresholds() {
    assert_eq!(curated_importance(999), Importance::Optional);
    assert_eq!(curated_importance(1_000), Importance::Recommended);
    assert_eq!(curated_importance(5_000), Importance::Essential);
}

// --- categorization & tags ---

#[test]
fn test_determine_category_prefers_topics() {
    let topics: BTreeSet<String> = ["service-mesh".to_string()].into();
    assert_eq!(
        determine_category("somename", "a gateway of sorts", &topics),
        Some("Service Mesh")
    );
}

#[test]
fn test_determine_category_falls_back_to_text_then_none() {
    let none = BTreeSet::new();
    assert_eq!(
        determine_category("kong", "cloud-native api gateway", &none),
        Some("API Gateway")
    );
    assert_eq!(determine_category("mystery", "does things", &none), None);
}

#[test]
fn test_extract_tags_unions_topics_and_keywords() {
    let topics: BTreeSet<String> = ["Kubernetes".to_string()].into();
    let tags = extract_tags("envoy", "high performance proxy for APIs", &topics);
    assert!(tags.contains("kubernetes"));
    assert!(tags.contains("proxy"));
    assert!(tags.contains("api"));
}
