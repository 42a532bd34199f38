//! Treemap rendering of flattened leaves.
//!
//! This module converts leaf descriptors into a nested, proportional-area
//! SVG diagram. Nesting follows the structural paths, so non-branching
//! links are collapsed out of the picture.

pub mod generator;
pub mod layout;

// Re-export main types
pub use generator::{generate_text_summary, generate_treemap, TreemapConfig};
pub use layout::{squarify, Rect};
