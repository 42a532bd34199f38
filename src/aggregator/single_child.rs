//! Detect non-branching links across the whole leaf set.
//!
//! A parent that has exactly one distinct child at some depth, over every
//! leaf in the dataset, adds nesting without adding information. Each depth
//! is classified on its own from the static leaf paths, so the result does
//! not depend on leaf order or on what was collapsed at other depths.

use crate::parser::schema::SingleStep;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Set of (parent path, child name) pairs that never branch
///
/// A parent can have at most one single-step child, so the set is stored
/// as a map from parent path to that child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleStepSet {
    steps: BTreeMap<Vec<String>, String>,
}

impl SingleStepSet {
    /// True if `child` is the only child ever seen under `parent`
    pub fn contains<S: AsRef<str>>(&self, parent: &[S], child: &str) -> bool {
        let key: Vec<String> = parent.iter().map(|s| s.as_ref().to_string()).collect();
        self.steps.get(&key).is_some_and(|only| only == child)
    }

    /// Number of single-step links
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when every parent branches
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over `(parent path, child)` pairs, shallowest parents first
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &str)> {
        self.steps.iter().map(|(p, c)| (p.as_slice(), c.as_str()))
    }

    /// Serializable form for reports and diagnostics
    pub fn to_entries(&self) -> Vec<SingleStep> {
        let mut entries: Vec<SingleStep> = self
            .iter()
            .map(|(parent, child)| SingleStep {
                parent_path: parent.to_vec(),
                child: child.to_string(),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.parent_path
                .len()
                .cmp(&b.parent_path.len())
                .then_with(|| a.parent_path.cmp(&b.parent_path))
        });
        entries
    }

    fn insert(&mut self, parent: Vec<String>, child: String) {
        self.steps.insert(parent, child);
    }
}

/// Find all single-step links in a set of leaf paths
///
/// **Public** - main entry point for the analyzer
///
/// # Arguments
/// * `leaf_paths` - Original paths of every leaf in the tree
/// * `depth` - Number of hierarchy levels to inspect
///
/// # Algorithm
/// For each depth k in 0..depth:
/// 1. Group leaf paths that reach depth k by their first k segments
/// 2. Collect the distinct segments at position k in each group
/// 3. A group with exactly one distinct segment is a single-step
pub fn find_single_steps(leaf_paths: &[Vec<String>], depth: usize) -> SingleStepSet {
    let mut steps = SingleStepSet::default();

    for k in 0..depth {
        let mut groups: BTreeMap<&[String], BTreeSet<&str>> = BTreeMap::new();
        for path in leaf_paths.iter().filter(|p| p.len() > k) {
            groups.entry(&path[..k]).or_default().insert(path[k].as_str());
        }

        for (parent, children) in groups {
            if children.len() == 1 {
                if let Some(only) = children.into_iter().next() {
                    steps.insert(parent.to_vec(), only.to_string());
                }
            }
        }
    }

    debug!(
        "Found {} single-step links across {} leaf paths",
        steps.len(),
        leaf_paths.len()
    );

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_single_chain_is_all_single_steps() {
        let steps = find_single_steps(&paths(&[&["A", "X"]]), 2);
        assert_eq!(steps.len(), 2);
        assert!(steps.contains::<&str>(&[], "A"));
        assert!(steps.contains(&["A"], "X"));
    }

    #[test]
    fn test_branching_root_is_not_single_step() {
        let steps = find_single_steps(&paths(&[&["A", "X"], &["A", "Y"], &["B"]]), 2);
        assert!(!steps.contains::<&str>(&[], "A"));
        assert!(!steps.contains::<&str>(&[], "B"));
        assert!(!steps.contains(&["A"], "X"));
        assert!(steps.is_empty());
    }

    #[test]
    fn test_short_leaves_are_ignored_at_deeper_levels() {
        // B stops at depth 1, so only A's subtree is inspected at depth 1
        let steps = find_single_steps(&paths(&[&["A", "X", "P"], &["A", "X", "Q"], &["B"]]), 3);
        assert!(steps.contains(&["A"], "X"));
        assert!(!steps.contains(&["A", "X"], "P"));
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_depth_limits_inspection() {
        let steps = find_single_steps(&paths(&[&["A", "X"]]), 1);
        assert!(steps.contains::<&str>(&[], "A"));
        assert!(!steps.contains(&["A"], "X"));
    }

    #[test]
    fn test_entries_are_ordered_by_depth() {
        let steps = find_single_steps(&paths(&[&["A", "B", "C"]]), 3);
        let entries = steps.to_entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].parent_path.is_empty());
        assert_eq!(entries[0].child, "A");
        assert_eq!(entries[2].parent_path, vec!["A", "B"]);
        assert_eq!(entries[2].child, "C");
    }
}
