//! Summary metrics over the flattened leaves.
//!
//! The largest leaves are the main drivers of the measure; the distribution
//! tells how concentrated the dataset is and how much nesting the
//! structural collapse removed.

use crate::parser::schema::LeafDescriptor;
use log::debug;

/// Take the `top_n` largest leaves
///
/// **Public** - used by the text summary and the command log
///
/// Leaves from `flatten_leaves` are already sorted by value, but this does
/// not rely on it.
pub fn calculate_top_leaves(leaves: &[LeafDescriptor], top_n: usize) -> Vec<&LeafDescriptor> {
    debug!("Selecting top {} of {} leaves", top_n, leaves.len());

    let mut sorted: Vec<&LeafDescriptor> = leaves.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted.truncate(top_n);
    sorted
}

/// Calculate value distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_value_distribution(leaves: &[LeafDescriptor]) -> ValueDistribution {
    if leaves.is_empty() {
        return ValueDistribution::default();
    }

    let total: f64 = leaves.iter().map(|l| l.value).sum();
    let count = leaves.len();
    let mean = total / count as f64;

    let mut values: Vec<f64> = leaves.iter().map(|l| l.value).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };

    // Top 10% of leaves
    let top_count = (count as f64 * 0.1).ceil() as usize;
    let top_10_percent_value: f64 = values.iter().take(top_count).sum();

    let original_levels: usize = leaves.iter().map(|l| l.original_path.len()).sum();
    let structural_levels: usize = leaves.iter().map(|l| l.structural_path.len()).sum();

    ValueDistribution {
        total_value: total,
        leaf_count: count,
        mean_value_per_leaf: mean,
        median_value_per_leaf: median,
        top_10_percent_value,
        top_10_percent_percentage: if total > 0.0 {
            (top_10_percent_value / total) * 100.0
        } else {
            0.0
        },
        max_original_depth: leaves.iter().map(|l| l.original_path.len()).max().unwrap_or(0),
        max_structural_depth: leaves.iter().map(|l| l.structural_path.len()).max().unwrap_or(0),
        collapsed_levels: original_levels - structural_levels,
    }
}

/// Value distribution statistics
///
/// **Public** - returned from calculate_value_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueDistribution {
    /// Sum of all leaf values
    pub total_value: f64,

    /// Number of leaves
    pub leaf_count: usize,

    pub mean_value_per_leaf: f64,
    pub median_value_per_leaf: f64,

    /// Value held by the largest 10% of leaves
    pub top_10_percent_value: f64,

    /// Percentage of the total held by the largest 10%
    pub top_10_percent_percentage: f64,

    /// Deepest original path
    pub max_original_depth: usize,

    /// Deepest structural path
    pub max_structural_depth: usize,

    /// Levels removed over all leaves
    pub collapsed_levels: usize,
}

impl ValueDistribution {
    /// Returns true if the top 10% of leaves hold more than 80% of the value
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.0} | Leaves: {} | Mean: {:.1} | Median: {:.1} | Top 10%: {:.1}% | Depth: {} -> {}",
            self.total_value,
            self.leaf_count,
            self.mean_value_per_leaf,
            self.median_value_per_leaf,
            self.top_10_percent_percentage,
            self.max_original_depth,
            self.max_structural_depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(original: &[&str], structural: &[&str], value: f64) -> LeafDescriptor {
        LeafDescriptor {
            structural_path: structural.iter().map(|s| s.to_string()).collect(),
            original_path: original.iter().map(|s| s.to_string()).collect(),
            display_label: String::new(),
            original_path_string: original.join(" > "),
            value,
            percentage: 0.0,
        }
    }

    #[test]
    fn test_calculate_top_leaves() {
        let leaves = vec![
            leaf(&["a"], &["a"], 2000.0),
            leaf(&["b"], &["b"], 5000.0),
            leaf(&["c"], &["c"], 3000.0),
        ];

        let top = calculate_top_leaves(&leaves, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label(), "b");
        assert_eq!(top[1].label(), "c");
    }

    #[test]
    fn test_calculate_value_distribution() {
        let leaves = vec![
            leaf(&["s", "a"], &["a"], 8000.0),
            leaf(&["s", "b"], &["b"], 1000.0),
            leaf(&["s", "c"], &["c"], 500.0),
            leaf(&["s", "d"], &["d"], 500.0),
        ];

        let dist = calculate_value_distribution(&leaves);

        assert_eq!(dist.total_value, 10000.0);
        assert_eq!(dist.leaf_count, 4);
        assert_eq!(dist.mean_value_per_leaf, 2500.0);
        assert_eq!(dist.max_original_depth, 2);
        assert_eq!(dist.max_structural_depth, 1);
        assert_eq!(dist.collapsed_levels, 4);
        assert!(!dist.is_highly_concentrated()); // Top leaf has exactly 80%
    }

    #[test]
    fn test_median_even_and_odd_counts() {
        let even = vec![
            leaf(&["a"], &["a"], 40.0),
            leaf(&["b"], &["b"], 30.0),
            leaf(&["c"], &["c"], 10.0),
            leaf(&["d"], &["d"], 20.0),
        ];
        assert_eq!(calculate_value_distribution(&even).median_value_per_leaf, 25.0);

        let odd = &even[..3];
        assert_eq!(calculate_value_distribution(odd).median_value_per_leaf, 30.0);
    }

    #[test]
    fn test_value_distribution_empty() {
        let dist = calculate_value_distribution(&[]);
        assert_eq!(dist.total_value, 0.0);
        assert_eq!(dist.leaf_count, 0);
    }
}
