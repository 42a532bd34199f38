//! Rewrite leaf paths into their collapsed structural form.
//!
//! The structural path drops every single-step link except the leaf itself,
//! so a chain like `A > X` with no siblings renders one level deep. The
//! original path, label and value travel alongside untouched.

use super::single_child::SingleStepSet;
use super::tree_builder::AggregateTree;
use crate::parser::schema::LeafDescriptor;
use crate::utils::config::PATH_SEPARATOR;
use crate::utils::format::{display_label, percentage};
use log::debug;

/// Compute the structural path for one original path
///
/// **Public** - used by flatten_leaves and tests
///
/// Segment i is dropped when `(path[..i], path[i])` is a single-step and i
/// is not the last index. The last segment is always kept, so the result
/// is never empty for a non-empty input.
pub fn structural_path(original: &[String], steps: &SingleStepSet) -> Vec<String> {
    let last = original.len().saturating_sub(1);
    original
        .iter()
        .enumerate()
        .filter(|(i, segment)| *i == last || !steps.contains(&original[..*i], segment))
        .map(|(_, segment)| segment.clone())
        .collect()
}

/// Build the leaf descriptor for one original path
///
/// **Private** - internal conversion
fn describe_leaf(
    original: &[String],
    value: f64,
    total: f64,
    steps: &SingleStepSet,
) -> LeafDescriptor {
    let label = original.last().map(String::as_str).unwrap_or_default();

    LeafDescriptor {
        structural_path: structural_path(original, steps),
        original_path: original.to_vec(),
        display_label: display_label(label, value, total),
        original_path_string: original.join(PATH_SEPARATOR),
        value,
        percentage: percentage(value, total),
    }
}

/// Flatten every leaf of the tree into renderer-ready descriptors
///
/// **Public** - main entry point for the rewriter
///
/// # Arguments
/// * `tree` - Finished aggregate tree
/// * `steps` - Single-step set computed from the same tree
///
/// # Returns
/// One descriptor per leaf, sorted by value (descending), then by path
pub fn flatten_leaves(tree: &AggregateTree, steps: &SingleStepSet) -> Vec<LeafDescriptor> {
    let total = tree.total();

    let mut leaves: Vec<LeafDescriptor> = tree
        .root
        .leaves()
        .into_iter()
        .filter(|node| !node.original_path.is_empty())
        .map(|node| describe_leaf(&node.original_path, node.value, total, steps))
        .collect();

    leaves.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.original_path.cmp(&b.original_path))
    });

    let collapsed: usize = leaves.iter().map(LeafDescriptor::collapsed_levels).sum();
    debug!(
        "Flattened {} leaves, {} levels collapsed in total",
        leaves.len(),
        collapsed
    );

    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::single_child::find_single_steps;
    use crate::aggregator::tree_builder::build_tree;
    use crate::parser::schema::Record;

    fn owned(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_chain_collapses_to_leaf() {
        let tree = build_tree(&[Record::from_path(&["A", "X"], 10.0).unwrap()], 2).unwrap();
        let steps = find_single_steps(&tree.leaf_paths(), 2);
        let leaves = flatten_leaves(&tree, &steps);

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].structural_path, owned(&["X"]));
        assert_eq!(leaves[0].original_path_string, "A > X");
        assert_eq!(leaves[0].display_label, "X (10, 100.00%)");
    }

    #[test]
    fn test_last_segment_is_never_dropped() {
        let steps = find_single_steps(&[owned(&["A", "B", "C"])], 3);
        assert_eq!(steps.len(), 3);
        assert_eq!(structural_path(&owned(&["A", "B", "C"]), &steps), owned(&["C"]));
    }

    #[test]
    fn test_middle_link_collapses() {
        let leaf_paths = vec![owned(&["A", "M", "X"]), owned(&["A", "M", "Y"]), owned(&["B"])];
        let steps = find_single_steps(&leaf_paths, 3);

        assert_eq!(structural_path(&leaf_paths[0], &steps), owned(&["A", "X"]));
        assert_eq!(structural_path(&leaf_paths[1], &steps), owned(&["A", "Y"]));
        assert_eq!(structural_path(&leaf_paths[2], &steps), owned(&["B"]));
    }

    #[test]
    fn test_empty_path_stays_empty() {
        let steps = SingleStepSet::default();
        assert!(structural_path(&[], &steps).is_empty());
    }

    #[test]
    fn test_leaves_sorted_by_value() {
        let records = vec![
            Record::from_path(&["A", "X"], 10.0).unwrap(),
            Record::from_path(&["A", "Y"], 5.0).unwrap(),
            Record::from_path(&["B"], 30.0).unwrap(),
        ];
        let tree = build_tree(&records, 2).unwrap();
        let steps = find_single_steps(&tree.leaf_paths(), 2);
        let leaves = flatten_leaves(&tree, &steps);

        let labels: Vec<&str> = leaves.iter().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["B", "X", "Y"]);
        assert_eq!(leaves[0].percentage, 66.67);
    }
}
