//! Layout tree arena.
//!
//! Nodes are stored in a flat arena and referenced by [`NodeId`] handles.
//! Columns hold rows and rows hold columns; the arena enforces that
//! alternation when children are attached. A child slot may be empty, which
//! the placement pass skips.

use serde::Deserialize;

use crate::axis::Axis;
use crate::box_model::{self, Spacing};
use crate::{EdgeSizes, LayoutError, Result};

/// Handle to a node in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Kind of container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Vertical box; children are rows.
    Column,
    /// Horizontal box; children are columns.
    Row,
}

impl NodeKind {
    /// Axis along which children are stacked.
    pub fn main_axis(self) -> Axis {
        match self {
            NodeKind::Column => Axis::Vertical,
            NodeKind::Row => Axis::Horizontal,
        }
    }

    /// The kind a child of this node must have.
    pub fn child_kind(self) -> NodeKind {
        match self {
            NodeKind::Column => NodeKind::Row,
            NodeKind::Row => NodeKind::Column,
        }
    }
}

/// Explicit size along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Pixels.
    Px(f32),
    /// Percentage of the parent's content size on the same axis.
    Percent(f32),
}

impl Dimension {
    /// Resolve against the parent's content extent.
    pub fn resolve(&self, container: f32) -> f32 {
        match *self {
            Dimension::Px(px) => px,
            Dimension::Percent(pct) => pct / 100.0 * container,
        }
    }
}

/// Horizontal placement of a row's columns when none of them fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
}

/// A column or row with its sizing attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub kind: NodeKind,
    /// Key under which the node's rectangle is recorded.
    pub id: Option<String>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub margin: Option<Spacing>,
    pub padding: Option<Spacing>,
    /// Take an even share of the leftover width when no width is given.
    pub fill_width: bool,
    /// Take an even share of the leftover height when no height is given.
    pub fill_height: bool,
    /// Only read on rows.
    pub justification: Justification,
    /// Explicit children; `None` is an empty slot.
    pub children: Vec<Option<NodeId>>,
    /// Child repeated `repeat` times instead of `children`.
    pub template: Option<NodeId>,
    pub repeat: usize,
}

impl LayoutNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            width: None,
            height: None,
            margin: None,
            padding: None,
            fill_width: false,
            fill_height: false,
            justification: Justification::Left,
            children: Vec::new(),
            template: None,
            repeat: 0,
        }
    }

    pub fn column() -> Self {
        Self::new(NodeKind::Column)
    }

    pub fn row() -> Self {
        Self::new(NodeKind::Row)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: Dimension) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_margin(mut self, margin: impl Into<Spacing>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    pub fn with_padding(mut self, padding: impl Into<Spacing>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn fill_width(mut self) -> Self {
        self.fill_width = true;
        self
    }

    pub fn fill_height(mut self) -> Self {
        self.fill_height = true;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    /// Explicit size along `axis`.
    pub fn size(&self, axis: Axis) -> Option<Dimension> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Whether the node fills leftover space along `axis`.
    pub fn fills(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.fill_width,
            Axis::Vertical => self.fill_height,
        }
    }

    pub fn margin_edges(&self) -> EdgeSizes {
        box_model::edges(self.margin.as_ref())
    }

    pub fn padding_edges(&self) -> EdgeSizes {
        box_model::edges(self.padding.as_ref())
    }

    /// Template and count, when the node repeats a template.
    ///
    /// Takes precedence over `children` whenever the count is positive.
    pub fn repeated(&self) -> Option<(NodeId, usize)> {
        match self.template {
            Some(template) if self.repeat > 0 => Some((template, self.repeat)),
            _ => None,
        }
    }
}

/// Arena of layout nodes.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node and return its handle.
    pub fn insert(&mut self, node: LayoutNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Result<&LayoutNode> {
        self.nodes.get(id.index()).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut LayoutNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or(LayoutError::UnknownNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` to `parent`'s explicit children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_child_kind(parent, child)?;
        self.get_mut(parent)?.children.push(Some(child));
        Ok(())
    }

    /// Append an empty child slot to `parent`.
    pub fn append_empty(&mut self, parent: NodeId) -> Result<()> {
        self.get_mut(parent)?.children.push(None);
        Ok(())
    }

    /// Repeat `template` `count` times inside `parent`.
    pub fn set_template(&mut self, parent: NodeId, template: NodeId, count: usize) -> Result<()> {
        self.check_child_kind(parent, template)?;
        let node = self.get_mut(parent)?;
        node.template = Some(template);
        node.repeat = count;
        Ok(())
    }

    fn check_child_kind(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind = self.get(parent)?.kind;
        let child_kind = self.get(child)?.kind;
        if parent_kind.child_kind() != child_kind {
            return Err(LayoutError::KindMismatch {
                parent: parent_kind,
                child: child_kind,
            });
        }
        Ok(())
    }
}
