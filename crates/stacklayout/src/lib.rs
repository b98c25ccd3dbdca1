//! # Stack Layout
//!
//! Two-pass box layout engine for trees of alternating columns and rows.
//!
//! ## Design Goals
//!
//! 1. **Measurement**: Compute every node's bounding size bottom-up from explicit
//!    sizes or from its children, padding and margin
//! 2. **Placement**: Distribute the available rectangle top-down, resolving
//!    percentages, fill shares, margins, padding and row justification
//! 3. **No drawing**: Produce geometry only; drawing happens in a caller-supplied
//!    [`RenderListener`] invoked with each node's rectangle
//! 4. **Immutable input**: Bounding sizes live in a [`Measurements`] side table,
//!    the [`LayoutTree`] arena is never mutated by a layout call
//!
//! ## Example
//!
//! ```
//! use stacklayout::{layout, Dimension, LayoutNode, LayoutTree, NoopListener};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.insert(LayoutNode::column().with_id("root"));
//! let row = tree.insert(LayoutNode::row().with_height(Dimension::Px(20.0)));
//! let cell = tree.insert(LayoutNode::column().with_id("cell").with_width(Dimension::Px(40.0)));
//! tree.append_child(root, row).unwrap();
//! tree.append_child(row, cell).unwrap();
//!
//! let rects = layout(&tree, root, &mut NoopListener).unwrap();
//! assert_eq!(rects["cell"].width, 40.0);
//! ```

pub mod axis;
pub mod box_model;
pub mod description;
pub mod engine;
pub mod measure;
pub mod place;
pub mod tree;

pub use axis::Axis;
pub use box_model::{SideSpacing, Spacing};
pub use description::{
    ColumnDescription, NodeAttributes, RowDescription, SizeUnit, TreeDescription,
};
pub use engine::{layout, measure, place, LayoutEngine, LayoutOptions};
pub use measure::Measurements;
pub use place::{hit_test, LayoutMap, NoopListener, RenderListener};
pub use tree::{Dimension, Justification, LayoutNode, LayoutTree, NodeId, NodeKind};

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Cyclic layout: node {0:?} contains itself")]
    CyclicLayout(NodeId),

    #[error("Layout depth {depth} exceeds limit {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("A {child:?} cannot be placed inside a {parent:?}")]
    KindMismatch { parent: NodeKind, child: NodeKind },

    #[error("Node {0:?} has no bounding size; measure the tree first")]
    Unmeasured(NodeId),

    #[error("Invalid tree description: {0}")]
    Description(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Description(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// A 2D rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Shrink by the given edges, clamping the remaining size at zero.
    pub fn inset(&self, edges: &EdgeSizes) -> Rect {
        Rect {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.horizontal()).max(0.0),
            height: (self.height - edges.vertical()).max(0.0),
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Edge sizes (margin, padding).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.area(), 5000.0);
        assert!(r.contains(50.0, 30.0));
        assert!(!r.contains(0.0, 0.0));
        assert!(!r.contains(110.0, 30.0));
    }

    #[test]
    fn test_inset_subtracts_edges() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let padding = EdgeSizes {
            top: 5.0,
            right: 10.0,
            bottom: 5.0,
            left: 10.0,
        };
        assert_eq!(r.inset(&padding), Rect::new(10.0, 5.0, 80.0, 40.0));
    }

    #[test]
    fn test_inset_clamps_at_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0);
        let padding = EdgeSizes {
            top: 5.0,
            right: 8.0,
            bottom: 5.0,
            left: 8.0,
        };
        let content = r.inset(&padding);
        assert_eq!(content.x, 8.0);
        assert_eq!(content.y, 5.0);
        assert_eq!(content.width, 0.0);
        assert_eq!(content.height, 0.0);
    }

    #[test]
    fn test_edge_sizes_sums() {
        let e = EdgeSizes {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(e.horizontal(), 6.0);
        assert_eq!(e.vertical(), 4.0);
    }

    #[test]
    fn test_error_display() {
        let err = LayoutError::DepthExceeded {
            depth: 10,
            limit: 8,
        };
        assert_eq!(err.to_string(), "Layout depth 10 exceeds limit 8");
    }
}
