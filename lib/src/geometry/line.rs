//! Straight line segment.

use super::PointF;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed line segment between two points.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: PointF,
    pub b: PointF,
}

impl Line {
    /// Create a new segment from `a` to `b`.
    #[inline]
    pub const fn new(a: PointF, b: PointF) -> Self {
        Self { a, b }
    }

    /// Segment length (mm).
    #[inline]
    pub fn length(&self) -> CoordF {
        self.a.distance(&self.b)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_length() {
        let l = Line::new(PointF::new(0.0, 0.0), PointF::new(6.0, 8.0));
        assert!((l.length() - 10.0).abs() < 1e-12);
        assert_eq!(format!("{l:?}"), format!("Line({:?} -> {:?})", l.a, l.b));
    }
}
