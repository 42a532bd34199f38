//! Build the aggregate tree from aggregated records.
//!
//! Each record's path is walked from the root, creating children on demand.
//! The value lands on the node where the path ends; a single post-order
//! pass then rolls every subtree up into its parent.
//!
//! Example: records `A;X 10`, `A;Y 5`, `B 3` give
//! `Root(18) -> A(15) -> {X(10), Y(5)}` and `Root -> B(3)`.

use crate::parser::schema::Record;
use crate::utils::config::{ROOT_NAME, SUM_TOLERANCE};
use crate::utils::error::AggregateError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// A node of the aggregate tree
///
/// **Public** - read by the analyzer, rewriter and tests
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Segment name ("Root" for the sentinel)
    pub name: String,

    /// Own value plus the values of all descendants
    pub value: f64,

    /// Value of records whose path ends exactly here
    pub own_value: f64,

    /// Children keyed by segment name
    pub children: BTreeMap<String, TreeNode>,

    /// True when the node has no children (set by the post-order pass)
    pub is_leaf: bool,

    /// Segments from the first level down to this node (empty for the root)
    pub original_path: Vec<String>,
}

impl TreeNode {
    fn new(name: String, original_path: Vec<String>) -> Self {
        Self {
            name,
            value: 0.0,
            own_value: 0.0,
            children: BTreeMap::new(),
            is_leaf: false,
            original_path,
        }
    }

    fn root() -> Self {
        Self::new(ROOT_NAME.to_string(), Vec::new())
    }

    fn insert(&mut self, path: &[&str], value: f64) {
        match path.split_first() {
            None => {
                self.own_value += value;
                self.is_leaf = true;
            }
            Some((head, tail)) => {
                let parent_path = &self.original_path;
                let child = self.children.entry(head.to_string()).or_insert_with(|| {
                    let mut child_path = parent_path.clone();
                    child_path.push(head.to_string());
                    TreeNode::new(head.to_string(), child_path)
                });
                child.insert(tail, value);
            }
        }
    }

    /// Post-order pass: roll up totals and settle leaf flags
    fn finalize(&mut self) -> f64 {
        let children_total: f64 = self.children.values_mut().map(TreeNode::finalize).sum();
        self.value = self.own_value + children_total;
        self.is_leaf = self.children.is_empty();
        self.value
    }

    /// Look up a direct child by name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    /// Look up a descendant by path relative to this node
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// All leaves below (or at) this node, in name order
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        if self.children.is_empty() {
            out.push(self);
            return;
        }
        for child in self.children.values() {
            child.collect_leaves(out);
        }
    }

    /// Number of levels below this node
    pub fn height(&self) -> usize {
        self.children
            .values()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(TreeNode::node_count).sum::<usize>()
    }

    /// Sum of direct values that no leaf carries
    ///
    /// That is the own value of every node with children, plus anything
    /// attributed to the root itself.
    pub fn merged_direct_value(&self) -> f64 {
        let is_real_leaf = self.children.is_empty() && !self.original_path.is_empty();
        let own = if is_real_leaf { 0.0 } else { self.own_value };
        own + self
            .children
            .values()
            .map(TreeNode::merged_direct_value)
            .sum::<f64>()
    }
}

/// The finished, read-only aggregate tree
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTree {
    /// Sentinel root
    pub root: TreeNode,

    /// Number of hierarchy levels (D)
    pub depth: usize,

    /// Number of records inserted
    pub record_count: usize,

    /// True when the root total was replaced by the record sum
    pub total_corrected: bool,
}

impl AggregateTree {
    /// Dataset total
    pub fn total(&self) -> f64 {
        self.root.value
    }

    /// Original paths of all leaves, in name order
    pub fn leaf_paths(&self) -> Vec<Vec<String>> {
        self.root
            .leaves()
            .into_iter()
            .filter(|leaf| !leaf.original_path.is_empty())
            .map(|leaf| leaf.original_path.clone())
            .collect()
    }
}

/// Build an aggregate tree from records
///
/// **Public** - main entry point for tree construction
///
/// # Arguments
/// * `records` - Aggregated records (unique paths with summed values)
/// * `depth` - Number of hierarchy levels; longer paths are cut to this depth
///
/// # Returns
/// The finished tree with post-order totals and leaf flags
///
/// # Errors
/// * `AggregateError::EmptyDataset` - No records given
///
/// # Algorithm
/// 1. Insert each record, walking and creating nodes along its path
/// 2. Add the value to the node where the path ends
/// 3. Post-order pass: value = own value + sum of children
/// 4. Compare the root total with the plain record sum
pub fn build_tree(records: &[Record], depth: usize) -> Result<AggregateTree, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }

    debug!("Building aggregate tree from {} records (depth {})", records.len(), depth);

    let mut root = TreeNode::root();
    for record in records {
        let mut path = record.path();
        path.truncate(depth);
        if path.is_empty() {
            debug!("Record without any hierarchy level, attributing {} to root", record.value);
        }
        root.insert(&path, record.value);
    }

    root.finalize();

    let expected: f64 = records.iter().map(|r| r.value).sum();
    let total_corrected = reconcile_total(&mut root, expected);

    debug!(
        "Built tree with {} nodes, {} leaves, total {}",
        root.node_count(),
        root.leaves().len(),
        root.value
    );

    Ok(AggregateTree {
        root,
        depth,
        record_count: records.len(),
        total_corrected,
    })
}

/// Compare the rolled-up root total with the expected record sum
///
/// On a mismatch beyond the relative tolerance the root total is replaced
/// by `expected` and `true` is returned.
pub fn reconcile_total(root: &mut TreeNode, expected: f64) -> bool {
    let tolerance = SUM_TOLERANCE * expected.abs().max(1.0);
    if (root.value - expected).abs() <= tolerance {
        return false;
    }

    warn!(
        "Inconsistent aggregate: tree total {} differs from record sum {}, using record sum",
        root.value, expected
    );
    root.value = expected;
    true
}
