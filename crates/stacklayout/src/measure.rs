//! Measurement pass.
//!
//! Computes each node's bounding size bottom-up: the size it would occupy
//! given unconstrained space, margin included. Results are kept in a side
//! table indexed by [`NodeId`] so the tree itself stays untouched.
//!
//! Per node:
//! 1. Content size comes from the repeated template (main axis summed over the
//!    count, cross axis taken once), or from the explicit children (main axis
//!    summed, cross axis maximum), or is zero.
//! 2. Each axis uses the explicit pixel size when present, otherwise content
//!    plus padding. Percent sizes are unknown until placement and fall back to
//!    content plus padding.
//! 3. Margin is added on top.

use tracing::{trace, warn};

use crate::axis::Axis;
use crate::tree::{Dimension, LayoutNode, LayoutTree, NodeId};
use crate::{LayoutError, Result, Size};

/// Bounding sizes produced by the measurement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    sizes: Vec<Option<Size>>,
}

impl Measurements {
    /// Bounding size of `id`, if it was reached by the pass.
    pub fn get(&self, id: NodeId) -> Option<Size> {
        self.sizes.get(id.index()).copied().flatten()
    }

    /// Bounding size of `id`, or [`LayoutError::Unmeasured`].
    pub fn bounding_size(&self, id: NodeId) -> Result<Size> {
        self.get(id).ok_or(LayoutError::Unmeasured(id))
    }

    /// Number of measured nodes.
    pub fn len(&self) -> usize {
        self.sizes.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Measure the subtree rooted at `root`.
pub(crate) fn measure_tree(
    tree: &LayoutTree,
    root: NodeId,
    max_depth: usize,
) -> Result<Measurements> {
    let mut measurer = Measurer {
        tree,
        max_depth,
        on_stack: vec![false; tree.len()],
        sizes: vec![None; tree.len()],
    };
    measurer.measure_node(root, 0)?;
    Ok(Measurements {
        sizes: measurer.sizes,
    })
}

struct Measurer<'a> {
    tree: &'a LayoutTree,
    max_depth: usize,
    on_stack: Vec<bool>,
    sizes: Vec<Option<Size>>,
}

impl<'a> Measurer<'a> {
    fn measure_slot(&mut self, slot: Option<NodeId>, depth: usize) -> Result<Size> {
        match slot {
            Some(id) => self.measure_node(id, depth),
            None => Ok(Size::zero()),
        }
    }

    fn measure_node(&mut self, id: NodeId, depth: usize) -> Result<Size> {
        if depth > self.max_depth {
            warn!(?id, depth, limit = self.max_depth, "measure: depth limit exceeded");
            return Err(LayoutError::DepthExceeded {
                depth,
                limit: self.max_depth,
            });
        }

        let tree = self.tree;
        let node = tree.get(id)?;
        if self.on_stack[id.index()] {
            warn!(?id, "measure: node contains itself");
            return Err(LayoutError::CyclicLayout(id));
        }
        self.on_stack[id.index()] = true;

        let content = self.content_size(node, depth)?;
        let size = Size::new(
            outer_size(node, content, Axis::Horizontal),
            outer_size(node, content, Axis::Vertical),
        );

        self.on_stack[id.index()] = false;
        self.sizes[id.index()] = Some(size);

        trace!(
            ?id,
            kind = ?node.kind,
            content_width = content.width,
            content_height = content.height,
            width = size.width,
            height = size.height,
            "measure: bounding size"
        );

        Ok(size)
    }

    fn content_size(&mut self, node: &LayoutNode, depth: usize) -> Result<Size> {
        let main = node.kind.main_axis();
        let cross = main.cross();

        if let Some((template, count)) = node.repeated() {
            let single = self.measure_node(template, depth + 1)?;
            return Ok(Size::from_axes(
                main,
                single.along(main) * count as f32,
                single.along(cross),
            ));
        }

        let mut main_total = 0.0f32;
        let mut cross_max = 0.0f32;
        for slot in &node.children {
            let child = self.measure_slot(*slot, depth + 1)?;
            main_total += child.along(main);
            cross_max = cross_max.max(child.along(cross));
        }
        Ok(Size::from_axes(main, main_total, cross_max))
    }
}

/// Explicit pixel size or content plus padding, then margin.
fn outer_size(node: &LayoutNode, content: Size, axis: Axis) -> f32 {
    let inner = match node.size(axis) {
        Some(Dimension::Px(px)) => px,
        Some(Dimension::Percent(_)) | None => {
            content.along(axis) + node.padding_edges().sum(axis)
        }
    };
    inner + node.margin_edges().sum(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_model::{SideSpacing, Spacing};

    const NO_LIMIT: usize = usize::MAX;

    #[test]
    fn test_empty_node_is_zero() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(LayoutNode::column());
        let m = measure_tree(&tree, root, NO_LIMIT).unwrap();
        assert_eq!(m.get(root), Some(Size::zero()));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_explicit_size_plus_margin() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(
            LayoutNode::column()
                .with_width(Dimension::Px(100.0))
                .with_height(Dimension::Px(40.0))
                .with_padding(50.0)
                .with_margin(5.0),
        );
        let m = measure_tree(&tree, root, NO_LIMIT).unwrap();
        // Padding is inside the explicit size.
        assert_eq!(m.get(root), Some(Size::new(110.0, 50.0)));
    }

    #[test]
    fn test_column_sums_rows_and_takes_widest() {
        let mut tree = LayoutTree::new();
        let root = tree.insert(LayoutNode::column().with_padding(Spacing::Sides(SideSpacing {
            left: Some(2.0),
            top: Some(3.0),
            ..Default::default()
        })));
        let a = tree.insert(
            LayoutNode::row()
                .with_width(Dimension::Px(50.0))
                .with_height(Dimension::Px(10.0)),
        );
        let b = tree.insert(
            LayoutNode::row()
                .with_width(Dimension::Px(80.0))
                .with_height(Dimension::Px(20.0))
                .with_margin(1.0),
        );
        tree.append_child(root, a).unwrap();
        tree.append_empty(root).unwrap();
        tree.append_child(root, b).unwrap();

        let m = measure_tree(&tree, root, NO_LIMIT).unwrap();
        assert_eq!(m.get(a), Some(Size::new(50.0, 10.0)));
        assert_eq!(m.get(b), Some(Size::new(82.0, 22.0)));
        assert_eq!(m.get(root), Some(Size::new(84.0, 35.0)));
    }

    #[test]
    fn test_row_sums_columns_horizontally() {
        let mut tree = LayoutTree::new();
        let row = tree.insert(LayoutNode::row());
        for width in [10.0, 20.0, 30.0] {
            let col = tree.insert(
                LayoutNode::column()
                    .with_width(Dimension::Px(width))
                    .with_height(Dimension::Px(width / 2.0)),
            );
            tree.append_child(row, col).unwrap();
        }
        let m = measure_tree(&tree, row, NO_LIMIT).unwrap();
        assert_eq!(m.get(row), Some(Size::new(60.0, 15.0)));
    }

    #[test]
    fn test_template_repeats_along_main_axis() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(LayoutNode::column());
        let template = tree.insert(
            LayoutNode::row()
                .with_width(Dimension::Px(70.0))
                .with_height(Dimension::Px(20.0))
                .with_margin(Spacing::symmetric(0.0, 2.0)),
        );
        let ignored = tree.insert(LayoutNode::row().with_height(Dimension::Px(999.0)));
        tree.append_child(column, ignored).unwrap();
        tree.set_template(column, template, 4).unwrap();

        let m = measure_tree(&tree, column, NO_LIMIT).unwrap();
        assert_eq!(m.get(column), Some(Size::new(70.0, 96.0)));
        assert_eq!(m.get(ignored), None);
    }

    #[test]
    fn test_percent_size_falls_back_to_content() {
        let mut tree = LayoutTree::new();
        let row = tree.insert(
            LayoutNode::row()
                .with_width(Dimension::Percent(50.0))
                .with_padding(4.0),
        );
        let col = tree.insert(
            LayoutNode::column()
                .with_width(Dimension::Px(30.0))
                .with_height(Dimension::Px(10.0)),
        );
        tree.append_child(row, col).unwrap();
        let m = measure_tree(&tree, row, NO_LIMIT).unwrap();
        assert_eq!(m.get(row), Some(Size::new(38.0, 18.0)));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(LayoutNode::column());
        let row = tree.insert(LayoutNode::row());
        tree.set_template(column, row, 2).unwrap();
        tree.append_child(row, column).unwrap();

        assert_eq!(
            measure_tree(&tree, column, NO_LIMIT),
            Err(LayoutError::CyclicLayout(column))
        );
    }

    #[test]
    fn test_shared_subtree_is_not_a_cycle() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(LayoutNode::column());
        let shared = tree.insert(LayoutNode::row().with_height(Dimension::Px(5.0)));
        tree.append_child(column, shared).unwrap();
        tree.append_child(column, shared).unwrap();

        let m = measure_tree(&tree, column, NO_LIMIT).unwrap();
        assert_eq!(m.get(column), Some(Size::new(0.0, 10.0)));
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(LayoutNode::column());
        let row = tree.insert(LayoutNode::row());
        let inner = tree.insert(LayoutNode::column());
        tree.append_child(column, row).unwrap();
        tree.append_child(row, inner).unwrap();

        assert!(measure_tree(&tree, column, 2).is_ok());
        assert_eq!(
            measure_tree(&tree, column, 1),
            Err(LayoutError::DepthExceeded { depth: 2, limit: 1 })
        );
    }

    #[test]
    fn test_measure_is_repeatable() {
        let mut tree = LayoutTree::new();
        let column = tree.insert(LayoutNode::column().with_padding(3.0));
        let row = tree.insert(LayoutNode::row().with_height(Dimension::Px(12.0)));
        tree.append_child(column, row).unwrap();

        let first = measure_tree(&tree, column, NO_LIMIT).unwrap();
        let second = measure_tree(&tree, column, NO_LIMIT).unwrap();
        assert_eq!(first, second);
    }
}
