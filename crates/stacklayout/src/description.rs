//! Tree descriptions.
//!
//! A serde-friendly form of the layout tree, written the way UI and chart
//! code spell their layouts as data:
//!
//! ```json
//! {
//!   "column": {
//!     "id": "chart",
//!     "padding": { "left": 10, "right": 10 },
//!     "rows": [
//!       { "height": 20, "columns": [{ "id": "title", "evenlyFillAvailableWidth": true }] },
//!       null,
//!       { "columns": [{ "rowTemplate": { "id": "bar", "height": 12 }, "numRows": 3 }] }
//!     ]
//!   }
//! }
//! ```
//!
//! Sizes are pixels unless the matching `widthUnit`/`heightUnit` is
//! `"PERCENT"`. `null` entries in `rows`/`columns` are kept as empty slots.

use serde::Deserialize;

use crate::box_model::Spacing;
use crate::tree::{Dimension, Justification, LayoutNode, LayoutTree, NodeId, NodeKind};
use crate::Result;

/// Unit of an explicit width or height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeUnit {
    #[default]
    Pixels,
    Percent,
}

impl SizeUnit {
    fn dimension(self, value: f32) -> Dimension {
        match self {
            SizeUnit::Pixels => Dimension::Px(value),
            SizeUnit::Percent => Dimension::Percent(value),
        }
    }
}

/// Attributes shared by columns and rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub width_unit: SizeUnit,
    #[serde(default)]
    pub height_unit: SizeUnit,
    #[serde(default)]
    pub margin: Option<Spacing>,
    #[serde(default)]
    pub padding: Option<Spacing>,
    #[serde(default)]
    pub evenly_fill_available_width: bool,
    #[serde(default)]
    pub evenly_fill_available_height: bool,
}

impl NodeAttributes {
    fn to_node(&self, kind: NodeKind) -> LayoutNode {
        let mut node = LayoutNode::new(kind);
        node.id = self.id.clone();
        node.width = self.width.map(|w| self.width_unit.dimension(w));
        node.height = self.height.map(|h| self.height_unit.dimension(h));
        node.margin = self.margin;
        node.padding = self.padding;
        node.fill_width = self.evenly_fill_available_width;
        node.fill_height = self.evenly_fill_available_height;
        node
    }
}

/// A column and its rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescription {
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub rows: Vec<Option<RowDescription>>,
    #[serde(default)]
    pub row_template: Option<Box<RowDescription>>,
    #[serde(default)]
    pub num_rows: Option<f64>,
}

/// A row and its columns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDescription {
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub justification: Justification,
    #[serde(default)]
    pub columns: Vec<Option<ColumnDescription>>,
    #[serde(default)]
    pub column_template: Option<Box<ColumnDescription>>,
    #[serde(default)]
    pub num_columns: Option<f64>,
}

/// Root of a described tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeDescription {
    Column(ColumnDescription),
    Row(RowDescription),
}

impl TreeDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build an arena tree, returning it with the root handle.
    pub fn build(&self) -> (LayoutTree, NodeId) {
        let mut tree = LayoutTree::new();
        let root = match self {
            TreeDescription::Column(column) => insert_column(&mut tree, column),
            TreeDescription::Row(row) => insert_row(&mut tree, row),
        };
        (tree, root)
    }
}

impl LayoutTree {
    /// Build a tree from its description.
    pub fn from_description(description: &TreeDescription) -> (LayoutTree, NodeId) {
        description.build()
    }

    /// Parse a JSON description and build the tree.
    pub fn from_json(json: &str) -> Result<(LayoutTree, NodeId)> {
        Ok(TreeDescription::from_json(json)?.build())
    }
}

/// Number of template repetitions. Counts that are not positive disable the
/// template; fractional counts round up.
fn repeat_count(count: Option<f64>) -> usize {
    match count {
        Some(count) if count > 0.0 => count.ceil() as usize,
        _ => 0,
    }
}

// Children are inserted before their parent so the parent can be built whole.
fn insert_column(tree: &mut LayoutTree, column: &ColumnDescription) -> NodeId {
    let mut node = column.attributes.to_node(NodeKind::Column);
    node.children = column
        .rows
        .iter()
        .map(|row| row.as_ref().map(|row| insert_row(tree, row)))
        .collect();
    node.template = column
        .row_template
        .as_deref()
        .map(|row| insert_row(tree, row));
    node.repeat = repeat_count(column.num_rows);
    tree.insert(node)
}

fn insert_row(tree: &mut LayoutTree, row: &RowDescription) -> NodeId {
    let mut node = row.attributes.to_node(NodeKind::Row);
    node.justification = row.justification;
    node.children = row
        .columns
        .iter()
        .map(|column| column.as_ref().map(|column| insert_column(tree, column)))
        .collect();
    node.template = row
        .column_template
        .as_deref()
        .map(|column| insert_column(tree, column));
    node.repeat = repeat_count(row.num_columns);
    tree.insert(node)
}
