//! Identity resolution and record merging.
//!
//! Sources rediscover the same tool under slightly different records (one may
//! know the homepage, another the GitHub URL and star count). [`ToolSet`]
//! folds candidate records into an insertion-ordered working set with at most
//! one entry per identity key; [`merge_tools`] defines the precedence when two
//! records collide.

use std::collections::HashMap;

use crate::types::Tool;

/// Merge two records describing the same tool.
///
/// The existing record wins wherever it already has data: earlier stages are
/// the more curated sources, and a later, noisier source must not degrade
/// them. Incoming fills only empty scalar fields. `name` and `is_open_source`
/// are always kept from `existing`; `tags` and `topics` are set unions;
/// `stars` takes the larger count and `importance` the stronger tier, so the
/// importance-follows-stars invariant survives merging in either direction.
pub fn merge_tools(existing: &Tool, incoming: &Tool) -> Tool {
    let pick = |a: &str, b: &str| {
        if a.is_empty() { b.to_string() } else { a.to_string() }
    };
    Tool {
        name: existing.name.clone(),
        description: pick(&existing.description, &incoming.description),
        category: pick(&existing.category, &incoming.category),
        importance: existing.importance.max(incoming.importance),
        is_open_source: existing.is_open_source,
        url: pick(&existing.url, &incoming.url),
        documentation_url: pick(&existing.documentation_url, &incoming.documentation_url),
        github_url: pick(&existing.github_url, &incoming.github_url),
        stars: existing.stars.max(incoming.stars),
        language: pick(&existing.language, &incoming.language),
        topics: existing.topics.union(&incoming.topics).cloned().collect(),
        tags: existing.tags.union(&incoming.tags).cloned().collect(),
    }
}

/// True when `a` and `b` denote the same real-world tool.
///
/// Names must match case-insensitively. Beyond that, a shared non-empty
/// GitHub URL or homepage URL is conclusive even when the other URL component
/// is missing on one side; records whose URL components are all empty fall
/// back to exact identity-key equality.
fn same_tool(a: &Tool, b: &Tool) -> bool {
    if !a.name.eq_ignore_ascii_case(&b.name) {
        return false;
    }
    if !a.github_url.is_empty() && a.github_url == b.github_url {
        return true;
    }
    if !a.url.is_empty() && a.url == b.url {
        return true;
    }
    a.identity() == b.identity()
}

/// Insertion-ordered working set of tools, deduplicated by identity.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<Tool>,
    // Buckets of indices into `tools`, keyed by lowercased name. Kept small
    // (same-named tools are rare), so bucket scans with `same_tool` are cheap.
    by_name: HashMap<String, Vec<usize>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one candidate record, merging it into an existing entry when it
    /// denotes a tool already in the set.
    pub fn insert(&mut self, tool: Tool) {
        let name_key = tool.name.to_lowercase();
        let hit = self.by_name.get(&name_key).and_then(|bucket| {
            bucket.iter().copied().find(|&i| same_tool(&self.tools[i], &tool))
        });
        match hit {
            Some(i) => {
                self.tools[i] = merge_tools(&self.tools[i], &tool);
                self.coalesce(&name_key);
            }
            None => {
                self.by_name.entry(name_key).or_default().push(self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// A merge can fill a previously empty URL component, making two entries
    /// that were distinguishable before recognizably the same tool. Re-scan
    /// the name bucket and unify such pairs until none remain; the
    /// earlier-discovered entry keeps its position and precedence.
    fn coalesce(&mut self, name_key: &str) {
        loop {
            let Some(bucket) = self.by_name.get(name_key) else {
                return;
            };
            let mut unify = None;
            'scan: for (n, &i) in bucket.iter().enumerate() {
                for &j in &bucket[n + 1..] {
                    if same_tool(&self.tools[i], &self.tools[j]) {
                        unify = Some((i.min(j), i.max(j)));
                        break 'scan;
                    }
                }
            }
            let Some((keep, drop)) = unify else {
                return;
            };
            self.tools[keep] = merge_tools(&self.tools[keep], &self.tools[drop]);
            self.remove_entry(drop);
        }
    }

    /// Remove the entry at `idx`, shifting later indices in every bucket.
    fn remove_entry(&mut self, idx: usize) {
        self.tools.remove(idx);
        for bucket in self.by_name.values_mut() {
            bucket.retain(|&i| i != idx);
            for i in bucket.iter_mut() {
                if *i > idx {
                    *i -= 1;
                }
            }
        }
    }

    /// Fold a stage's output into the set.
    pub fn fold(&mut self, tools: impl IntoIterator<Item = Tool>) {
        for tool in tools {
            self.insert(tool);
        }
    }

    pub fn as_slice(&self) -> &[Tool] {
        &self.tools
    }

    pub fn into_vec(self) -> Vec<Tool> {
        self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        let mut set = Self::new();
        set.fold(iter);
        set
    }
}
