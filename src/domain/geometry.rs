//! Plain 2-D geometry used by layout, reconciliation and the viewport.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Center position plus footprint of one node in tree coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point,
    pub size: Size,
}

impl Placement {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Same footprint, moved to `position`.
    pub fn moved_to(&self, position: Point) -> Self {
        Self {
            position,
            size: self.size,
        }
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.position.x, self.position.y - self.size.height / 2.0)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.size.height / 2.0)
    }

    pub fn bounds(&self) -> Bounds {
        let half_w = self.size.width / 2.0;
        let half_h = self.size.height / 2.0;
        Bounds {
            min_x: self.position.x - half_w,
            min_y: self.position.y - half_h,
            max_x: self.position.x + half_w,
            max_y: self.position.y + half_h,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Cubic connector from a parent's bottom edge to a child's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePath {
    pub source: Point,
    pub control_source: Point,
    pub control_target: Point,
    pub target: Point,
}

impl EdgePath {
    /// Connector between two placements, ending on each node's own boundary.
    pub fn between(parent: &Placement, child: &Placement) -> Self {
        let source = parent.bottom_center();
        let target = child.top_center();
        let mid_y = (source.y + target.y) / 2.0;
        Self {
            source,
            control_source: Point::new(source.x, mid_y),
            control_target: Point::new(target.x, mid_y),
            target,
        }
    }

    /// Zero-length connector collapsed onto a single point.
    pub fn degenerate(at: Point) -> Self {
        Self {
            source: at,
            control_source: at,
            control_target: at,
            target: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_terminates_on_node_boundaries() {
        let parent = Placement::new(Point::new(0.0, 0.0), Size::new(200.0, 96.0));
        let child = Placement::new(Point::new(50.0, 156.0), Size::new(160.0, 72.0));

        let edge = EdgePath::between(&parent, &child);

        assert_eq!(edge.source, Point::new(0.0, 48.0));
        assert_eq!(edge.target, Point::new(50.0, 120.0));
        assert_eq!(edge.control_source.y, 84.0);
        assert_eq!(edge.control_target, Point::new(50.0, 84.0));
    }

    #[test]
    fn union_covers_both_boxes() {
        let a = Placement::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0)).bounds();
        let b = Placement::new(Point::new(20.0, 20.0), Size::new(10.0, 10.0)).bounds();
        let u = a.union(b);
        assert_eq!((u.min_x, u.min_y, u.max_x, u.max_y), (-5.0, -5.0, 25.0, 25.0));
        assert_eq!(u.center(), Point::new(10.0, 10.0));
    }
}
