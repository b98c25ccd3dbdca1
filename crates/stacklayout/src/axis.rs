//! Main/cross axis accessors.
//!
//! Both layout passes are written once over a container's stacking (main)
//! axis and its cross axis. Columns stack their rows vertically, rows stack
//! their columns horizontally; everything else is the same code with the
//! axes swapped.

use crate::{EdgeSizes, Rect, Size};

/// Represents the main and cross axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Get the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl Size {
    /// Extent along `axis`.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a size from main/cross extents.
    pub fn from_axes(main_axis: Axis, main: f32, cross: f32) -> Self {
        match main_axis {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }
}

impl Rect {
    /// Start coordinate along `axis`.
    pub fn origin(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent along `axis`.
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a rectangle from main/cross positions and extents.
    pub fn from_axes(
        main_axis: Axis,
        main_pos: f32,
        cross_pos: f32,
        main_size: f32,
        cross_size: f32,
    ) -> Self {
        match main_axis {
            Axis::Horizontal => Rect::new(main_pos, cross_pos, main_size, cross_size),
            Axis::Vertical => Rect::new(cross_pos, main_pos, cross_size, main_size),
        }
    }
}

impl EdgeSizes {
    /// Leading edge along `axis` (left or top).
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Trailing edge along `axis` (right or bottom).
    pub fn end(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    /// Both edges along `axis`.
    pub fn sum(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}
