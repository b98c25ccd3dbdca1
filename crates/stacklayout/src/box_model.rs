//! Margin and padding resolution.
//!
//! A margin or padding is either one scalar applied to all four sides or a
//! per-side record where every side is optional. Resolution never fails:
//! absent values become zero.

use serde::Deserialize;

use crate::EdgeSizes;

/// Per-side spacing, each side optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SideSpacing {
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub right: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub bottom: Option<f32>,
}

/// Margin or padding value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    /// Same value on all four sides.
    All(f32),
    /// Independent sides; missing sides are zero.
    Sides(SideSpacing),
}

impl Spacing {
    /// Uniform spacing on all sides.
    pub fn all(value: f32) -> Self {
        Spacing::All(value)
    }

    /// Symmetric spacing (horizontal, vertical).
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Spacing::Sides(SideSpacing {
            left: Some(horizontal),
            right: Some(horizontal),
            top: Some(vertical),
            bottom: Some(vertical),
        })
    }

    /// Resolve to concrete edges.
    pub fn to_edges(&self) -> EdgeSizes {
        match *self {
            Spacing::All(v) => EdgeSizes {
                top: v,
                right: v,
                bottom: v,
                left: v,
            },
            Spacing::Sides(sides) => EdgeSizes {
                top: sides.top.unwrap_or(0.0),
                right: sides.right.unwrap_or(0.0),
                bottom: sides.bottom.unwrap_or(0.0),
                left: sides.left.unwrap_or(0.0),
            },
        }
    }
}

impl From<f32> for Spacing {
    fn from(value: f32) -> Self {
        Spacing::All(value)
    }
}

impl From<SideSpacing> for Spacing {
    fn from(sides: SideSpacing) -> Self {
        Spacing::Sides(sides)
    }
}

/// Resolve an optional spacing into four edges.
pub fn edges(spacing: Option<&Spacing>) -> EdgeSizes {
    spacing.map(Spacing::to_edges).unwrap_or_default()
}

/// Left + right of an optional spacing.
pub fn horizontal(spacing: Option<&Spacing>) -> f32 {
    edges(spacing).horizontal()
}

/// Top + bottom of an optional spacing.
pub fn vertical(spacing: Option<&Spacing>) -> f32 {
    edges(spacing).vertical()
}
