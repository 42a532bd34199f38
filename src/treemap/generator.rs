//! SVG treemap generation from flattened leaves.
//!
//! Leaves are nested by their structural path, so non-branching links
//! never become a box of their own. Every box is sized by the value of its
//! node in the aggregate tree, so values held directly by intermediate
//! nodes keep their share of the canvas as unlabelled space. Siblings are
//! placed with the squarified layout. Hover titles always show the
//! original path.

use super::layout::{squarify, Rect};
use crate::aggregator::Aggregate;
use crate::parser::schema::LeafDescriptor;
use crate::utils::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_CANVAS_SIDE, ROOT_NAME, SUM_TOLERANCE};
use crate::utils::error::RenderError;
use crate::utils::format::{format_percentage, format_value};
use log::{debug, info};
use std::collections::BTreeMap;

/// Height reserved for the chart title
const TITLE_HEIGHT: f64 = 40.0;

/// Approximate glyph width at 12px
const CHAR_WIDTH: f64 = 7.0;

/// Treemap configuration
#[derive(Debug, Clone)]
pub struct TreemapConfig {
    pub title: String,

    /// Name of the measure, shown in hover text
    pub value_label: String,

    pub width: usize,
    pub height: usize,

    /// Label band at the top of each container box
    pub header_height: f64,

    /// Gap between a container and its children
    pub padding: f64,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            title: "Hierarchy Treemap".to_string(),
            value_label: "Value".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            header_height: 18.0,
            padding: 2.0,
        }
    }
}

impl TreemapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_value_label(mut self, label: impl Into<String>) -> Self {
        self.value_label = label.into();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn validate(&self) -> Result<(), RenderError> {
        let ok = |side: usize| side > 0 && side <= MAX_CANVAS_SIDE;
        if !ok(self.width) || !ok(self.height) || (self.height as f64) <= TITLE_HEIGHT {
            return Err(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Box in the structural hierarchy
#[derive(Debug, Default)]
struct RenderNode<'a> {
    name: String,

    /// Value of the matching aggregate tree node, direct value included
    value: f64,
    leaf: Option<&'a LeafDescriptor>,
    children: BTreeMap<String, RenderNode<'a>>,
}

impl<'a> RenderNode<'a> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Children, largest first
    fn sorted_children(&self) -> Vec<&RenderNode<'a>> {
        let mut children: Vec<&RenderNode<'a>> = self.children.values().collect();
        children.sort_by(|a, b| b.value.total_cmp(&a.value));
        children
    }

    /// Lay the children out inside `bounds`
    ///
    /// Value the node holds beyond its children is reserved as trailing
    /// empty space, so every child area stays proportional to the total.
    fn child_rects(&self, bounds: Rect) -> Vec<(&RenderNode<'a>, Rect)> {
        let children = self.sorted_children();
        let mut values: Vec<f64> = children.iter().map(|c| c.value).collect();
        let direct = self.value - values.iter().sum::<f64>();
        if direct > SUM_TOLERANCE * self.value.abs().max(1.0) {
            values.push(direct);
        }
        children.into_iter().zip(squarify(&values, bounds)).collect()
    }

    fn depth(&self) -> usize {
        self.children
            .values()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Nest the leaves by structural path, taking each box value from the tree
///
/// Walks every original path alongside the aggregate tree and opens a box
/// only for segments that survive the structural rewrite.
fn build_render_tree(aggregate: &Aggregate) -> RenderNode<'_> {
    let mut root = RenderNode::new(ROOT_NAME);
    root.value = aggregate.total();

    for leaf in &aggregate.leaves {
        let path = &leaf.original_path;
        let last = path.len().saturating_sub(1);
        let mut tree_node = &aggregate.tree.root;
        let mut render_node = &mut root;

        for (i, segment) in path.iter().enumerate() {
            let Some(next) = tree_node.child(segment) else {
                break;
            };
            tree_node = next;
            if i != last && aggregate.single_steps.contains(&path[..i], segment) {
                continue;
            }
            render_node = render_node
                .children
                .entry(segment.clone())
                .or_insert_with(|| RenderNode::new(segment));
            render_node.value = tree_node.value;
        }
        render_node.leaf = Some(leaf);
    }

    root
}

/// Shared state while walking the render tree
struct RenderContext<'c> {
    config: &'c TreemapConfig,
    total: f64,
    out: String,
    boxes: usize,
}

/// Generate an SVG treemap from an aggregate
///
/// **Public** - main entry point for rendering
///
/// # Arguments
/// * `aggregate` - Tree, single-steps and leaf descriptors from the core
/// * `config` - Canvas and label settings (defaults when `None`)
///
/// # Errors
/// * `RenderError::EmptyLeaves` - Nothing to draw
/// * `RenderError::InvalidCanvas` - Zero or oversized canvas
pub fn generate_treemap(
    aggregate: &Aggregate,
    config: Option<&TreemapConfig>,
) -> Result<String, RenderError> {
    let leaves = &aggregate.leaves;
    if leaves.is_empty() {
        return Err(RenderError::EmptyLeaves);
    }

    let config = config.cloned().unwrap_or_default();
    config.validate()?;

    info!("Generating treemap with {} leaves", leaves.len());

    // 1. Build structural tree
    let root = build_render_tree(aggregate);
    debug!("Structural tree depth: {}", root.depth());

    let mut ctx = RenderContext {
        config: &config,
        total: root.value,
        out: String::new(),
        boxes: 0,
    };

    // 2. Render SVG
    let (width, height) = (config.width, config.height);
    ctx.out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    ));
    ctx.out.push_str(
        r#"<style>.box { stroke: white; stroke-width: 1; } .box:hover { stroke: black; cursor: pointer; } .label { font: 12px sans-serif; pointer-events: none; }</style>"#,
    );
    ctx.out.push_str(&format!(
        r#"<text x="{}" y="26" font-size="18" text-anchor="middle" font-weight="bold" font-family="sans-serif">{}</text>"#,
        width / 2,
        escape_xml(&config.title)
    ));

    let canvas = Rect::new(0.0, TITLE_HEIGHT, width as f64, height as f64 - TITLE_HEIGHT);
    for (index, (child, rect)) in root.child_rects(canvas).into_iter().enumerate() {
        render_node(child, rect, 1, branch_hue(index), &mut ctx);
    }

    ctx.out.push_str("</svg>");

    info!(
        "Treemap generated successfully ({} boxes, {} bytes)",
        ctx.boxes,
        ctx.out.len()
    );
    Ok(ctx.out)
}

fn render_node(node: &RenderNode<'_>, rect: Rect, level: usize, hue: f64, ctx: &mut RenderContext<'_>) {
    if rect.w < 1.0 || rect.h < 1.0 {
        return;
    } // Don't render invisible boxes

    ctx.boxes += 1;
    let fill = node_color(hue, level);
    let hover = hover_text(node, &ctx.config.value_label, ctx.total);

    ctx.out.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" class="box"><title>{}</title></rect>"#,
        rect.x, rect.y, rect.w, rect.h, fill, escape_xml(&hover)
    ));

    if node.children.is_empty() {
        let text = node
            .leaf
            .map(|l| l.display_label.as_str())
            .unwrap_or(node.name.as_str());
        if rect.h >= 16.0 {
            push_label(&mut ctx.out, text, rect, 14.0);
        }
        return;
    }

    // Container: header band with the segment name, children below
    if rect.h >= ctx.config.header_height {
        push_label(&mut ctx.out, &node.name, rect, 13.0);
    }

    let Some(inner) = rect.inset(ctx.config.padding, ctx.config.header_height) else {
        return;
    };

    for (child, child_rect) in node.child_rects(inner) {
        render_node(child, child_rect, level + 1, hue, ctx);
    }
}

fn push_label(out: &mut String, text: &str, rect: Rect, dy: f64) {
    if let Some(display) = get_truncated_name(text, rect.w) {
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" dx="4" dy="{}" fill="white" class="label">{}</text>"#,
            rect.x,
            rect.y,
            dy,
            escape_xml(&display)
        ));
    }
}

fn hover_text(node: &RenderNode<'_>, value_label: &str, total: f64) -> String {
    let heading = match node.leaf {
        Some(leaf) if node.children.is_empty() => leaf.original_path_string.clone(),
        _ => node.name.clone(),
    };
    format!(
        "{}\n{}: {}\nPercentage of Total: {}",
        heading,
        value_label,
        format_value(node.value),
        format_percentage(node.value, total)
    )
}

/// Hue for the n-th top-level branch (golden angle spacing)
fn branch_hue(index: usize) -> f64 {
    (index as f64 * 137.508) % 360.0
}

/// Deeper boxes get lighter
fn node_color(hue: f64, level: usize) -> String {
    let lightness = (32 + level * 9).min(80);
    format!("hsl({:.0}, 55%, {}%)", hue, lightness)
}

/// Fit a label into `width` pixels, or `None` if the box is too narrow
///
/// **Public** - exposed for tests
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    if width <= 35.0 {
        return None;
    }
    let max_chars = ((width - 8.0) / CHAR_WIDTH) as usize;
    let len = name.chars().count();
    if len <= max_chars {
        return Some(name.to_string());
    }
    if max_chars <= 3 {
        return None;
    }
    let head: String = name.chars().take(max_chars - 3).collect();
    Some(format!("{}...", head))
}

/// Escape text for use inside SVG/XML
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Create a text summary of the largest leaves
pub fn generate_text_summary(leaves: &[LeafDescriptor], max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  LARGEST LEAVES".to_string());
    lines.push(format!("  ┏{}┳{}┳{}┓", "━".repeat(52), "━".repeat(14), "━".repeat(9)));
    lines.push(format!("  ┃ {:<50} ┃ {:^12} ┃ {:^7} ┃", "Path (largest first)", "VALUE", "%"));
    lines.push(format!("  ┣{}╋{}╋{}┫", "━".repeat(52), "━".repeat(14), "━".repeat(9)));

    let mut sorted: Vec<&LeafDescriptor> = leaves.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    for leaf in sorted.iter().take(max_lines) {
        let path = &leaf.original_path_string;
        let count = path.chars().count();
        let display_path = if count > 50 {
            let tail: String = path.chars().skip(count - 47).collect();
            format!("...{}", tail)
        } else {
            path.clone()
        };

        lines.push(format!(
            "  ┃ {:<50} ┃ {:>12} ┃ {:>6.2}% ┃",
            display_path,
            format_value(leaf.value),
            leaf.percentage
        ));
    }

    lines.push(format!("  ┗{}┻{}┻{}┛", "━".repeat(52), "━".repeat(14), "━".repeat(9)));

    lines.push(String::new());
    lines.push("  SIMPLIFIED TREEMAP".to_string());
    for leaf in sorted.iter().take(5) {
        let bar_width = (leaf.percentage / 2.0) as usize; // Max 50 chars
        lines.push(format!(
            "  └─ {:<24} {:<50} {:>6.2}%",
            leaf.label(),
            "█".repeat(bar_width),
            leaf.percentage
        ));
    }

    if leaves.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} leaves)",
            max_lines,
            leaves.len()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::output::NullSink;
    use crate::parser::schema::Record;

    fn leaf(original: &[&str], structural: &[&str], value: f64, total: f64) -> LeafDescriptor {
        let label = original.last().unwrap();
        LeafDescriptor {
            structural_path: structural.iter().map(|s| s.to_string()).collect(),
            original_path: original.iter().map(|s| s.to_string()).collect(),
            display_label: crate::utils::format::display_label(label, value, total),
            original_path_string: original.join(" > "),
            value,
            percentage: crate::utils::format::percentage(value, total),
        }
    }

    fn rec(path: &[&str], value: f64) -> Record {
        Record::from_path(path, value).unwrap()
    }

    fn aggregate_of(records: Vec<Record>, depth: usize) -> Aggregate {
        aggregate(&records, depth, &mut NullSink).unwrap()
    }

    #[test]
    fn test_generate_treemap_empty() {
        // A record without any level only feeds the root, so there is no leaf
        let records = vec![Record::new(vec![None], 5.0).unwrap()];
        let result = aggregate(&records, 1, &mut NullSink).unwrap();
        assert!(matches!(generate_treemap(&result, None), Err(RenderError::EmptyLeaves)));
    }

    #[test]
    fn test_generate_treemap_invalid_canvas() {
        let result = aggregate_of(vec![rec(&["A"], 1.0)], 1);
        let config = TreemapConfig::new().with_size(0, 600);
        assert!(matches!(
            generate_treemap(&result, Some(&config)),
            Err(RenderError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_generate_treemap_nests_by_structural_path() {
        let result = aggregate_of(vec![rec(&["A", "X"], 10.0), rec(&["A", "Y"], 5.0), rec(&["B"], 3.0)], 2);
        let svg = generate_treemap(&result, None).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // Root children A and B, plus X and Y inside A
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("A &gt; X"));
        assert!(svg.contains("X (10, 55.56%)"));
    }

    #[test]
    fn test_collapsed_chain_renders_one_box() {
        let result = aggregate_of(vec![rec(&["A", "X"], 10.0)], 2);
        let svg = generate_treemap(&result, None).unwrap();

        assert_eq!(svg.matches("<rect").count(), 1);
        // Hover keeps the original path
        assert!(svg.contains("A &gt; X"));
    }

    #[test]
    fn test_intermediate_direct_value_keeps_its_share() {
        let result = aggregate_of(vec![rec(&["A"], 7.0), rec(&["A", "X"], 3.0), rec(&["B"], 3.0)], 2);
        let svg = generate_treemap(&result, None).unwrap();

        // A carries its own 7 on top of X
        assert!(svg.contains("Value: 10\nPercentage of Total: 76.92%"));
        assert!(svg.contains("A &gt; X\nValue: 3\nPercentage of Total: 23.08%"));
        assert!(svg.contains("X (3, 23.08%)"));
        assert!(!svg.contains("50.00%"));

        let root = build_render_tree(&result);
        assert_eq!(root.value, 13.0);
        let a = &root.children["A"];
        assert_eq!(a.value, 10.0);

        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rects = a.child_rects(bounds);
        assert_eq!(rects.len(), 1);
        assert!((rects[0].1.area() - 0.3 * bounds.area()).abs() < 1e-6);
    }

    #[test]
    fn test_root_direct_value_is_counted_in_total() {
        let records = vec![
            Record::new(vec![None], 2.0).unwrap(),
            rec(&["A"], 6.0),
            rec(&["B"], 2.0),
        ];
        let result = aggregate(&records, 1, &mut NullSink).unwrap();
        let svg = generate_treemap(&result, None).unwrap();

        assert!(svg.contains("A (6, 60.00%)"));
        assert!(svg.contains("Percentage of Total: 60.00%"));
        assert!(svg.contains("Percentage of Total: 20.00%"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let result = aggregate_of(vec![rec(&["R&D <core>"], 1.0)], 1);
        let config = TreemapConfig::new().with_title("Tickets & \"Costs\"");
        let svg = generate_treemap(&result, Some(&config)).unwrap();

        assert!(svg.contains("R&amp;D &lt;core&gt;"));
        assert!(svg.contains("Tickets &amp; &quot;Costs&quot;"));
        assert!(!svg.contains("<core>"));
    }

    #[test]
    fn test_get_truncated_name() {
        assert_eq!(get_truncated_name("long_function_name", 30.0), None);
        assert_eq!(get_truncated_name("abc", 40.0), Some("abc".to_string()));

        let name = "very_long_category_name";
        let truncated = get_truncated_name(name, 60.0).unwrap();
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() < name.len());
    }

    #[test]
    fn test_text_summary() {
        let leaves = vec![
            leaf(&["A", "X"], &["X"], 30.0, 40.0),
            leaf(&["B"], &["B"], 10.0, 40.0),
        ];
        let summary = generate_text_summary(&leaves, 1);

        assert!(summary.contains("A > X"));
        assert!(summary.contains("75.00%"));
        assert!(summary.contains("(Showing top 1 of 2 leaves)"));
    }
}
