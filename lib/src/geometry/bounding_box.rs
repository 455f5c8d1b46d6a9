//! Axis-aligned bounding box for outlines.

use super::PointF;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D axis-aligned bounding box with floating-point coordinates (in mm).
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxF {
    pub min: PointF,
    pub max: PointF,
    defined: bool,
}

impl BoundingBoxF {
    /// Create a new empty bounding box.
    #[inline]
    pub fn new() -> Self {
        Self {
            min: PointF::new(CoordF::MAX, CoordF::MAX),
            max: PointF::new(CoordF::MIN, CoordF::MIN),
            defined: false,
        }
    }

    /// Create a bounding box enclosing a set of points.
    pub fn from_points(points: impl IntoIterator<Item = PointF>) -> Self {
        let mut bb = Self::new();
        for p in points {
            bb.merge_point(p);
        }
        bb
    }

    /// Check if the bounding box is defined.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Merge a point into the bounding box.
    pub fn merge_point(&mut self, p: PointF) {
        if self.defined {
            self.min.x = self.min.x.min(p.x);
            self.min.y = self.min.y.min(p.y);
            self.max.x = self.max.x.max(p.x);
            self.max.y = self.max.y.max(p.y);
        } else {
            self.min = p;
            self.max = p;
            self.defined = true;
        }
    }

    /// Get the width (x extent).
    #[inline]
    pub fn width(&self) -> CoordF {
        if self.defined {
            self.max.x - self.min.x
        } else {
            0.0
        }
    }

    /// Get the height (y extent).
    #[inline]
    pub fn height(&self) -> CoordF {
        if self.defined {
            self.max.y - self.min.y
        } else {
            0.0
        }
    }

    /// Get the center.
    #[inline]
    pub fn center(&self) -> PointF {
        PointF::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

impl fmt::Debug for BoundingBoxF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            write!(f, "BoundingBoxF({:?} - {:?})", self.min, self.max)
        } else {
            write!(f, "BoundingBoxF(undefined)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_new_is_undefined() {
        let bb = BoundingBoxF::new();
        assert!(!bb.is_defined());
        assert_eq!(bb.width(), 0.0);
        assert_eq!(bb.height(), 0.0);
    }

    #[test]
    fn test_bounding_box_from_points() {
        let bb = BoundingBoxF::from_points([
            PointF::new(-2.0, 1.0),
            PointF::new(4.0, -3.0),
            PointF::new(0.0, 5.0),
        ]);
        assert!(bb.is_defined());
        assert_eq!(bb.width(), 6.0);
        assert_eq!(bb.height(), 8.0);
        assert_eq!(bb.center(), PointF::new(1.0, 1.0));
        assert_eq!(bb.min, PointF::new(-2.0, -3.0));
        assert_eq!(bb.max, PointF::new(4.0, 5.0));
    }
}
