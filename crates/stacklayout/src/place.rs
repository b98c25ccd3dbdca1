//! Placement pass.
//!
//! Walks the tree top-down, turning the rectangle a parent allocates into
//! rectangles for its children:
//!
//! 1. Notify the [`RenderListener`] with the node's rectangle and sibling index
//! 2. Subtract padding (clamped at zero) to get the content rectangle
//! 3. Repeated templates get equal slices along the main axis
//! 4. Explicit children are sized by explicit pixels, percentages of the
//!    content rectangle, an even share of the leftover space (fill), or their
//!    measured bounding size, and stacked with their margins
//! 5. Rows whose children do not fill start at an offset given by their
//!    justification
//!
//! Child sizes are not clamped: over-constrained nodes produce negative
//! extents rather than errors.

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::axis::Axis;
use crate::measure::Measurements;
use crate::tree::{Dimension, Justification, LayoutNode, LayoutTree, NodeId};
use crate::{EdgeSizes, LayoutError, Rect, Result};

/// Final rectangles keyed by node id.
///
/// Repeated templates are recorded once per repetition as `"{id}-{index}"`.
pub type LayoutMap = HashMap<String, Rect>;

/// Receives every placed node in visiting order.
///
/// Parents are reported before their children; siblings in order.
pub trait RenderListener {
    fn render(&mut self, node: NodeId, rect: Rect, index: usize);
}

impl<F> RenderListener for F
where
    F: FnMut(NodeId, Rect, usize),
{
    fn render(&mut self, node: NodeId, rect: Rect, index: usize) {
        self(node, rect, index)
    }
}

/// Listener that ignores every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl RenderListener for NoopListener {
    fn render(&mut self, _node: NodeId, _rect: Rect, _index: usize) {}
}

/// Ids whose rectangle contains the point, innermost first.
pub fn hit_test(rects: &LayoutMap, x: f32, y: f32) -> Vec<&str> {
    let mut hits: Vec<(&str, &Rect)> = rects
        .iter()
        .filter(|(_, rect)| rect.contains(x, y))
        .map(|(id, rect)| (id.as_str(), rect))
        .collect();
    hits.sort_by(|a, b| a.1.area().total_cmp(&b.1.area()).then_with(|| a.0.cmp(b.0)));
    hits.into_iter().map(|(id, _)| id).collect()
}

/// Place the subtree rooted at `root` inside `rect`.
pub(crate) fn place_tree<L: RenderListener + ?Sized>(
    tree: &LayoutTree,
    measurements: &Measurements,
    root: NodeId,
    rect: Rect,
    max_depth: usize,
    listener: &mut L,
) -> Result<LayoutMap> {
    let mut placer = Placer {
        tree,
        measurements,
        max_depth,
        on_stack: vec![false; tree.len()],
        listener,
        rects: LayoutMap::new(),
    };
    if let Some(id) = &tree.get(root)?.id {
        placer.rects.insert(id.clone(), rect);
    }
    placer.place_node(root, rect, 0, 0)?;
    Ok(placer.rects)
}

/// Explicit size along one axis: pixels as given, percentages of the
/// container extent less the node's own margin on that axis.
fn resolve_explicit(dimension: Dimension, container: f32, margin: f32) -> f32 {
    match dimension {
        Dimension::Px(px) => px,
        Dimension::Percent(_) => dimension.resolve(container) - margin,
    }
}

/// Sizing decided for one explicit child before positions are assigned.
struct ChildPlan<'a> {
    id: NodeId,
    node: &'a LayoutNode,
    margin: EdgeSizes,
    main_size: Option<f32>,
    fills: bool,
}

struct Placer<'a, L: RenderListener + ?Sized> {
    tree: &'a LayoutTree,
    measurements: &'a Measurements,
    max_depth: usize,
    on_stack: Vec<bool>,
    listener: &'a mut L,
    rects: LayoutMap,
}

impl<'a, L: RenderListener + ?Sized> Placer<'a, L> {
    fn place_node(&mut self, id: NodeId, rect: Rect, index: usize, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            warn!(?id, depth, limit = self.max_depth, "place: depth limit exceeded");
            return Err(LayoutError::DepthExceeded {
                depth,
                limit: self.max_depth,
            });
        }

        let tree = self.tree;
        let node = tree.get(id)?;
        if self.on_stack[id.index()] {
            warn!(?id, "place: node contains itself");
            return Err(LayoutError::CyclicLayout(id));
        }
        self.on_stack[id.index()] = true;

        self.listener.render(id, rect, index);

        let content = rect.inset(&node.padding_edges());
        trace!(
            ?id,
            kind = ?node.kind,
            index,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            content_width = content.width,
            content_height = content.height,
            "place: node"
        );

        match node.repeated() {
            Some((template, count)) => self.place_repeated(node, template, count, content, depth)?,
            None => self.place_children(node, content, depth)?,
        }

        self.on_stack[id.index()] = false;
        Ok(())
    }

    fn place_repeated(
        &mut self,
        parent: &LayoutNode,
        template: NodeId,
        count: usize,
        content: Rect,
        depth: usize,
    ) -> Result<()> {
        let tree = self.tree;
        let node = tree.get(template)?;
        let main = parent.kind.main_axis();
        let cross = main.cross();
        let margin = node.margin_edges();

        let main_size = match node.size(main) {
            Some(dimension) => resolve_explicit(dimension, content.extent(main), margin.sum(main)),
            None => content.extent(main) / count as f32 - margin.sum(main),
        };
        let cross_size = match node.size(cross) {
            Some(dimension) => {
                resolve_explicit(dimension, content.extent(cross), margin.sum(cross))
            }
            None => content.extent(cross) / count as f32 - margin.sum(cross),
        };

        let cross_pos = content.origin(cross) + margin.start(cross);
        let mut cursor = content.origin(main);
        for index in 0..count {
            cursor += margin.start(main);
            let rect = Rect::from_axes(main, cursor, cross_pos, main_size, cross_size);
            if let Some(id) = &node.id {
                self.rects.insert(format!("{id}-{index}"), rect);
            }
            self.place_node(template, rect, index, depth + 1)?;
            cursor += main_size + margin.end(main);
        }
        Ok(())
    }

    fn place_children(&mut self, parent: &LayoutNode, content: Rect, depth: usize) -> Result<()> {
        let tree = self.tree;
        let main = parent.kind.main_axis();
        let cross = main.cross();
        let available = content.extent(main);

        let mut plans = Vec::with_capacity(parent.children.len());
        for id in parent.children.iter().flatten().copied() {
            let node = tree.get(id)?;
            let margin = node.margin_edges();
            let main_size = node
                .size(main)
                .map(|dimension| resolve_explicit(dimension, available, margin.sum(main)));
            let fills = main_size.is_none() && node.fills(main);
            plans.push(ChildPlan {
                id,
                node,
                margin,
                main_size,
                fills,
            });
        }
        if plans.is_empty() {
            return Ok(());
        }

        // Only explicit sizes and their margins count as used space.
        let mut used = 0.0f32;
        for plan in &mut plans {
            match plan.main_size {
                Some(size) => used += size + plan.margin.sum(main),
                None if plan.fills => {}
                None => {
                    plan.main_size = Some(self.derived_size(plan.id, main, &plan.margin)?);
                }
            }
        }

        let fill_count = plans.iter().filter(|plan| plan.fills).count();
        let remaining = (available - used).max(0.0);
        let share = if fill_count > 0 {
            remaining / fill_count as f32
        } else {
            0.0
        };

        let mut cursor = match (main, fill_count) {
            (Axis::Horizontal, 0) => {
                let leftover = available - used;
                match parent.justification {
                    Justification::Left => content.x,
                    Justification::Right => content.x + leftover,
                    Justification::Center => content.x + leftover / 2.0,
                }
            }
            _ => content.origin(main),
        };

        trace!(
            children = plans.len(),
            used,
            remaining,
            fill_count,
            share,
            "place: distributed main axis"
        );

        for (index, plan) in plans.iter().enumerate() {
            let main_size = plan.main_size.unwrap_or(share);
            let cross_size = match plan.node.size(cross) {
                Some(dimension) => {
                    resolve_explicit(dimension, content.extent(cross), plan.margin.sum(cross))
                }
                None if plan.node.fills(cross) => {
                    content.extent(cross) - plan.margin.sum(cross)
                }
                None => self.derived_size(plan.id, cross, &plan.margin)?,
            };

            cursor += plan.margin.start(main);
            let rect = Rect::from_axes(
                main,
                cursor,
                content.origin(cross) + plan.margin.start(cross),
                main_size,
                cross_size,
            );
            if let Some(id) = &plan.node.id {
                self.rects.insert(id.clone(), rect);
            }
            self.place_node(plan.id, rect, index, depth + 1)?;
            cursor += main_size + plan.margin.end(main);
        }
        Ok(())
    }

    /// Measured bounding size along `axis` without the node's own margin.
    fn derived_size(&self, id: NodeId, axis: Axis, margin: &EdgeSizes) -> Result<f32> {
        let bounding = self.measurements.bounding_size(id)?;
        Ok(bounding.along(axis) - margin.sum(axis))
    }
}
