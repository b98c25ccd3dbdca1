//! Layout entry points.
//!
//! [`measure`] runs the measurement pass, [`layout`] measures and then places
//! the whole tree at the origin using the root's bounding size, and [`place`]
//! lets callers reuse measurements with a rectangle of their own. The free
//! functions use [`LayoutOptions::default`]; [`LayoutEngine`] carries custom
//! options.

use tracing::debug;

use crate::measure::{measure_tree, Measurements};
use crate::place::{place_tree, LayoutMap, RenderListener};
use crate::tree::{LayoutTree, NodeId};
use crate::{Rect, Result};

/// Recursion limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Deepest nesting either pass will follow before failing with
    /// [`LayoutError::DepthExceeded`](crate::LayoutError::DepthExceeded).
    pub max_depth: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Runs both layout passes with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Compute bounding sizes for every node reachable from `root`.
    pub fn measure(&self, tree: &LayoutTree, root: NodeId) -> Result<Measurements> {
        let measurements = measure_tree(tree, root, self.options.max_depth)?;
        debug!(
            ?root,
            measured = measurements.len(),
            nodes = tree.len(),
            "Measured layout tree"
        );
        Ok(measurements)
    }

    /// Place the subtree at `root` inside `rect` using existing measurements.
    pub fn place<L: RenderListener + ?Sized>(
        &self,
        tree: &LayoutTree,
        measurements: &Measurements,
        root: NodeId,
        rect: Rect,
        listener: &mut L,
    ) -> Result<LayoutMap> {
        let rects = place_tree(
            tree,
            measurements,
            root,
            rect,
            self.options.max_depth,
            listener,
        )?;
        debug!(
            ?root,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            recorded = rects.len(),
            "Placed layout tree"
        );
        Ok(rects)
    }

    /// Measure the tree, then place it at the origin at its bounding size.
    pub fn layout<L: RenderListener + ?Sized>(
        &self,
        tree: &LayoutTree,
        root: NodeId,
        listener: &mut L,
    ) -> Result<LayoutMap> {
        let measurements = self.measure(tree, root)?;
        let size = measurements.bounding_size(root)?;
        let rect = Rect::new(0.0, 0.0, size.width, size.height);
        self.place(tree, &measurements, root, rect, listener)
    }
}

/// Compute bounding sizes with default options.
pub fn measure(tree: &LayoutTree, root: NodeId) -> Result<Measurements> {
    LayoutEngine::new().measure(tree, root)
}

/// Measure and place the whole tree with default options.
pub fn layout<L: RenderListener + ?Sized>(
    tree: &LayoutTree,
    root: NodeId,
    listener: &mut L,
) -> Result<LayoutMap> {
    LayoutEngine::new().layout(tree, root, listener)
}

/// Place a measured tree inside `rect` with default options.
pub fn place<L: RenderListener + ?Sized>(
    tree: &LayoutTree,
    measurements: &Measurements,
    root: NodeId,
    rect: Rect,
    listener: &mut L,
) -> Result<LayoutMap> {
    LayoutEngine::new().place(tree, measurements, root, rect, listener)
}
