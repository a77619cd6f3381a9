use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side has no drawable extent (zero, negative or NaN).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Stable handle for a box registered in a [`crate::scene::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A measured rectangle whose top-left corner is positioned relative to its
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeBox {
    pub width: f32,
    pub height: f32,
    pub position: Point,
}

impl NodeBox {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            position: Point::new(0.0, 0.0),
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    /// Anchor for edges leaving this box.
    pub fn bottom_center(&self) -> Point {
        Point::new(self.position.x + self.width / 2.0, self.bottom())
    }

    /// Anchor for edges entering this box.
    pub fn top_center(&self) -> Point {
        Point::new(self.position.x + self.width / 2.0, self.position.y)
    }
}
