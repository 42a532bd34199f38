//! Aggregation of records into a collapsed hierarchy.
//!
//! This module transforms aggregated records into:
//! - An aggregate tree with rolled-up totals (tree_builder)
//! - The set of non-branching links (single_child)
//! - Leaf descriptors with structural paths (path_rewriter)
//! - Distribution statistics over the leaves (metrics)

pub mod metrics;
pub mod path_rewriter;
pub mod single_child;
pub mod tree_builder;

use crate::output::diagnostics::{emit_or_warn, Diagnostic, DiagnosticsSink};
use crate::parser::schema::{LeafDescriptor, Record};
use crate::utils::error::AggregateError;
use log::debug;

// Re-export main types and functions
pub use metrics::{calculate_top_leaves, calculate_value_distribution, ValueDistribution};
pub use path_rewriter::{flatten_leaves, structural_path};
pub use single_child::{find_single_steps, SingleStepSet};
pub use tree_builder::{build_tree, reconcile_total, AggregateTree, TreeNode};

/// Everything the core derives from one record set
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub tree: AggregateTree,
    pub single_steps: SingleStepSet,
    pub leaves: Vec<LeafDescriptor>,
}

impl Aggregate {
    /// Dataset total
    pub fn total(&self) -> f64 {
        self.tree.total()
    }

    /// Sum of the flattened leaf values
    pub fn leaf_total(&self) -> f64 {
        self.leaves.iter().map(|l| l.value).sum()
    }

    /// Value held directly by nodes that also have children
    ///
    /// It counts toward every ancestor total but belongs to no leaf, so
    /// `leaf_total() + merged_direct_value() == total()`.
    pub fn merged_direct_value(&self) -> f64 {
        self.tree.root.merged_direct_value()
    }
}

/// Run build, analyze and rewrite over a record set
///
/// **Public** - main entry point of the core
///
/// # Arguments
/// * `records` - Aggregated records
/// * `depth` - Number of hierarchy levels (D)
/// * `sink` - Receives the single-step set and the flattened leaves
///
/// # Errors
/// * `AggregateError::EmptyDataset` - No records given
pub fn aggregate(
    records: &[Record],
    depth: usize,
    sink: &mut dyn DiagnosticsSink,
) -> Result<Aggregate, AggregateError> {
    let tree = build_tree(records, depth)?;

    let single_steps = find_single_steps(&tree.leaf_paths(), depth);
    emit_or_warn(sink, Diagnostic::SingleSteps(&single_steps));

    let leaves = flatten_leaves(&tree, &single_steps);
    emit_or_warn(sink, Diagnostic::Leaves(&leaves));

    debug!(
        "Aggregate ready: total {}, {} leaves, {} single-steps",
        tree.total(),
        leaves.len(),
        single_steps.len()
    );

    Ok(Aggregate {
        tree,
        single_steps,
        leaves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::diagnostics::NullSink;

    #[test]
    fn test_aggregate_scenario_b() {
        let records = vec![Record::from_path(&["A", "X"], 10.0).unwrap()];
        let result = aggregate(&records, 2, &mut NullSink).unwrap();

        assert_eq!(result.total(), 10.0);
        assert_eq!(result.single_steps.len(), 2);
        assert_eq!(result.leaves[0].structural_path, vec!["X".to_string()]);
        assert_eq!(result.leaves[0].original_path_string, "A > X");
    }

    #[test]
    fn test_aggregate_merged_value_accounting() {
        let records = vec![
            Record::from_path(&["A"], 7.0).unwrap(),
            Record::from_path(&["A", "X"], 3.0).unwrap(),
        ];
        let result = aggregate(&records, 2, &mut NullSink).unwrap();

        assert_eq!(result.total(), 10.0);
        assert_eq!(result.leaf_total(), 3.0);
        assert_eq!(result.merged_direct_value(), 7.0);
    }
}
