//! Merge-engine tests: identity keys, precedence, and fold dedup.

use std::collections::BTreeSet;
use toolscout::merge::{ToolSet, merge_tools};
use toolscout::{Importance, Tool};

fn tags(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tool(name: &str, url: &str, github_url: &str) -> Tool {
    Tool {
        name: name.to_string(),
        category: "API Gateway".to_string(),
        url: url.to_string(),
        github_url: github_url.to_string(),
        ..Tool::default()
    }
}

// --- identity ---

#[test]
fn test_identity_lowercases_name() {
    let a = tool("Kong", "https://konghq.com", "https://github.com/Kong/kong");
    let b = tool("kong", "https://konghq.com", "https://github.com/Kong/kong");
    assert_eq!(a.identity(), b.identity());
}

#[test]
fn test_identity_empty_components_participate() {
    let a = tool("tool", "", "");
    let b = tool("tool", "", "");
    let c = tool("tool", "https://example.com", "");
    assert_eq!(a.identity(), b.identity());
    assert_ne!(a.identity(), c.identity());
}

// --- merge precedence ---

#[test]
fn test_merge_existing_scalars_win() {
    let mut existing = tool("kong", "https://konghq.com", "https://github.com/Kong/kong");
    existing.description = "API gateway".to_string();
    let mut incoming = existing.clone();
    incoming.description = "different description".to_string();
    incoming.category = "Service Mesh".to_string();

    let merged = merge_tools(&existing, &incoming);
    assert_eq!(merged.description, "API gateway");
    assert_eq!(merged.category, "API Gateway");
}

#[test]
fn test_merge_incoming_fills_empty_fields() {
    let existing = tool("kong", "", "https://github.com/Kong/kong");
    let mut incoming = tool("kong", "https://konghq.com", "https://github.com/Kong/kong");
    incoming.description = "Cloud-native API gateway".to_string();
    incoming.documentation_url = "https://docs.konghq.com".to_string();
    incoming.language = "Lua".to_string();

    let merged = merge_tools(&existing, &incoming);
    assert_eq!(merged.url, "https://konghq.com");
    assert_eq!(merged.description, "Cloud-native API gateway");
    assert_eq!(merged.documentation_url, "https://docs.konghq.com");
    assert_eq!(merged.language, "Lua");
}

#[test]
fn test_merge_name_and_open_source_always_from_existing() {
    let mut existing = tool("Kong", "https://konghq.com", "https://github.com/Kong/kong");
    existing.is_open_source = false;
    let mut incoming = tool("kong-gateway", "https://konghq.com", "https://github.com/Kong/kong");
    incoming.is_open_source = true;

    let merged = merge_tools(&existing, &incoming);
    assert_eq!(merged.name, "Kong");
    assert!(!merged.is_open_source);
}

#[test]
fn test_merge_tags_union_commutative() {
    let mut a = tool("t", "https://t.dev", "");
    a.tags = tags(&["api", "gateway"]);
    let mut b = tool("t", "https://t.dev", "");
    b.tags = tags(&["gateway", "proxy"]);

    let ab = merge_tools(&a, &b);
    let ba = merge_tools(&b, &a);
    assert_eq!(ab.tags, tags(&["api", "gateway", "proxy"]));
    assert_eq!(ab.tags, ba.tags);
}

#[test]
fn test_merge_idempotent() {
    let mut a = tool("t", "https://t.dev", "");
    a.tags = tags(&["api"]);
    a.stars = 100;
    let mut b = tool("t", "https://t.dev", "https://github.com/t/t");
    b.tags = tags(&["proxy"]);
    b.description = "desc".to_string();
    b.stars = 7000;
    b.importance = Importance::Recommended;

    let once = merge_tools(&a, &b);
    let twice = merge_tools(&a, &once);
    assert_eq!(once, twice);
}

#[test]
fn test_merge_keeps_stronger_importance_and_star_count() {
    let mut a = tool("t", "https://t.dev", "");
    a.importance = Importance::Essential;
    a.stars = 38_000;
    let b = tool("t", "https://t.dev", "");

    assert_eq!(merge_tools(&a, &b).importance, Importance::Essential);
    assert_eq!(merge_tools(&b, &a).importance, Importance::Essential);
    assert_eq!(merge_tools(&b, &a).stars, 38_000);
}

// --- folding / dedup ---

#[test]
fn test_fold_no_duplicate_identity_keys() {
    let mut set = ToolSet::new();
    set.fold(vec![
        tool("a", "https://a.dev", ""),
        tool("b", "https://b.dev", ""),
        tool("A", "https://a.dev", ""),
        tool("b", "https://b.dev", ""),
    ]);
    assert_eq!(set.len(), 2);

    let keys: Vec<_> = set.as_slice().iter().map(|t| t.identity()).collect();
    for (i, key) in keys.iter().enumerate() {
        assert!(!keys[i + 1..].contains(key), "duplicate identity key {key:?}");
    }
}

#[test]
fn test_fold_preserves_insertion_order() {
    let mut set = ToolSet::new();
    set.fold(vec![
        tool("z", "https://z.dev", ""),
        tool("a", "https://a.dev", ""),
        tool("z", "https://z.dev", ""),
    ]);
    let names: Vec<_> = set.as_slice().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["z", "a"]);
}

// Two sources discover Kong: an awesome list knows only the GitHub URL, the
// topic search also knows the homepage and stars. One catalog entry results.
#[test]
fn test_kong_discovered_twice_merges_to_one_entry() {
    let sparse = tool("Kong", "", "https://github.com/Kong/kong");
    let mut rich = tool("Kong", "https://konghq.com", "https://github.com/Kong/kong");
    rich.stars = 38_000;
    rich.importance = Importance::Essential;

    for order in [vec![sparse.clone(), rich.clone()], vec![rich, sparse]] {
        let mut set = ToolSet::new();
        set.fold(order);
        assert_eq!(set.len(), 1);
        let merged = &set.as_slice()[0];
        assert_eq!(merged.url, "https://konghq.com");
        assert_eq!(merged.github_url, "https://github.com/Kong/kong");
        assert_eq!(merged.importance, Importance::Essential);
    }
}

// A homepage-only record and a GitHub-only record for the same tool are
// indistinguishable until a record carrying both URLs arrives; the merge that
// fills the missing component must also collapse the earlier pair.
#[test]
fn test_bridging_record_collapses_split_entries() {
    let homepage_only = tool("Kong", "https://konghq.com", "");
    let github_only = tool("Kong", "", "https://github.com/Kong/kong");
    let bridge = tool("Kong", "https://konghq.com", "https://github.com/Kong/kong");

    let mut set = ToolSet::new();
    set.fold([homepage_only, github_only]);
    assert_eq!(set.len(), 2);

    set.insert(bridge);
    assert_eq!(set.len(), 1);
    let merged = &set.as_slice()[0];
    assert_eq!(merged.url, "https://konghq.com");
    assert_eq!(merged.github_url, "https://github.com/Kong/kong");
}

// Collapsing split entries must not corrupt the positions of unrelated tools.
#[test]
fn test_collapse_keeps_other_entries_intact() {
    let mut set = ToolSet::new();
    set.fold([
        tool("alpha", "https://alpha.dev", ""),
        tool("Kong", "https://konghq.com", ""),
        tool("Kong", "", "https://github.com/Kong/kong"),
        tool("zeta", "", "https://github.com/z/zeta"),
    ]);
    assert_eq!(set.len(), 4);

    set.insert(tool("Kong", "https://konghq.com", "https://github.com/Kong/kong"));
    let names: Vec<_> = set.as_slice().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["alpha", "Kong", "zeta"]);

    // Later inserts still dedup against the surviving entries.
    set.insert(tool("zeta", "", "https://github.com/z/zeta"));
    set.insert(tool("alpha", "https://alpha.dev", ""));
    assert_eq!(set.len(), 3);
}
