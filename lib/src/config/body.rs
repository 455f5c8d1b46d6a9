//! Cell body, seal margins and validation limits.

use serde::{Deserialize, Serialize};

use crate::geometry::{build_footprint, Footprint};
use crate::{non_negative, CoordF};

/// Kind of cell being designed. Carried as a label; the geometry engine
/// treats every kind as a rounded-rectangle body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Pouch,
    Prismatic,
    Cylindrical,
}

/// Outer body of the cell (mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellBody {
    /// Extent along the top edge.
    pub width_mm: CoordF,
    /// Extent along the side edges.
    pub height_mm: CoordF,
    pub thickness_mm: CoordF,
    pub corner_radius_mm: CoordF,
    pub seal_thickness_mm: CoordF,
}

impl Default for CellBody {
    fn default() -> Self {
        Self {
            width_mm: 120.0,
            height_mm: 90.0,
            thickness_mm: 12.0,
            corner_radius_mm: 8.0,
            seal_thickness_mm: 0.5,
        }
    }
}

impl CellBody {
    /// Create a body with the default radius and seal thickness.
    pub fn new(width_mm: CoordF, height_mm: CoordF, thickness_mm: CoordF) -> Self {
        Self {
            width_mm,
            height_mm,
            thickness_mm,
            ..Default::default()
        }
    }

    /// Builder method: set corner radius.
    pub fn corner_radius(mut self, radius_mm: CoordF) -> Self {
        self.corner_radius_mm = radius_mm;
        self
    }

    /// Builder method: set seal thickness.
    pub fn seal_thickness(mut self, thickness_mm: CoordF) -> Self {
        self.seal_thickness_mm = thickness_mm;
        self
    }

    /// Largest corner radius the body can carry.
    #[inline]
    pub fn max_corner_radius_mm(&self) -> CoordF {
        0.5 * self.width_mm.min(self.height_mm)
    }

    /// Largest seal thickness allowed for this body thickness.
    #[inline]
    pub fn max_seal_thickness_mm(&self) -> CoordF {
        0.5 * self.thickness_mm
    }

    /// Body outline (x = width, y = height), 16 chords per corner.
    pub fn footprint(&self) -> Footprint {
        build_footprint(self.width_mm, self.height_mm, self.corner_radius_mm)
    }

    /// Negative extents take their absolute value; negative radius and seal
    /// thickness become zero. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.width_mm = self.width_mm.abs();
        self.height_mm = self.height_mm.abs();
        self.thickness_mm = self.thickness_mm.abs();
        self.corner_radius_mm = non_negative(self.corner_radius_mm);
        self.seal_thickness_mm = non_negative(self.seal_thickness_mm);
        *self != before
    }
}

/// Unfilled laminate border reserved for heat sealing on each edge (mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealMargins {
    pub left_mm: CoordF,
    pub right_mm: CoordF,
    pub top_mm: CoordF,
    pub bottom_mm: CoordF,
}

impl Default for SealMargins {
    fn default() -> Self {
        Self {
            left_mm: 5.0,
            right_mm: 5.0,
            top_mm: 18.0,
            bottom_mm: 18.0,
        }
    }
}

impl SealMargins {
    /// Same margin on every edge.
    pub fn uniform(margin_mm: CoordF) -> Self {
        Self {
            left_mm: margin_mm,
            right_mm: margin_mm,
            top_mm: margin_mm,
            bottom_mm: margin_mm,
        }
    }

    /// The narrower of the two side seals.
    #[inline]
    pub fn min_side_mm(&self) -> CoordF {
        self.left_mm.min(self.right_mm)
    }

    /// The narrowest seal on any edge.
    #[inline]
    pub fn min_mm(&self) -> CoordF {
        self.min_side_mm().min(self.top_mm).min(self.bottom_mm)
    }

    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.left_mm = non_negative(self.left_mm);
        self.right_mm = non_negative(self.right_mm);
        self.top_mm = non_negative(self.top_mm);
        self.bottom_mm = non_negative(self.bottom_mm);
        *self != before
    }
}

/// Constants used by the validation rules (mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Minimum seal margin on every edge.
    pub min_seal_mm: CoordF,
    /// Extra thickness taken by the laminate on top of the sealed stack.
    pub laminate_allowance_mm: CoordF,
    /// Clearance between the outermost tab and the end of its edge.
    pub tab_edge_clearance_mm: CoordF,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_seal_mm: 3.0,
            laminate_allowance_mm: 0.3,
            tab_edge_clearance_mm: 2.0,
        }
    }
}

impl ValidationLimits {
    /// Negative or NaN limits become zero. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.min_seal_mm = non_negative(self.min_seal_mm);
        self.laminate_allowance_mm = non_negative(self.laminate_allowance_mm);
        self.tab_edge_clearance_mm = non_negative(self.tab_edge_clearance_mm);
        // NaN != NaN, so compare bit patterns.
        before.min_seal_mm.to_bits() != self.min_seal_mm.to_bits()
            || before.laminate_allowance_mm.to_bits() != self.laminate_allowance_mm.to_bits()
            || before.tab_edge_clearance_mm.to_bits() != self.tab_edge_clearance_mm.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_defaults() {
        let body = CellBody::default();
        assert_eq!(body.max_corner_radius_mm(), 45.0);
        assert_eq!(body.max_seal_thickness_mm(), 6.0);
        assert_eq!(body.footprint().effective_radius(), 8.0);
    }

    #[test]
    fn test_body_normalize() {
        let mut body = CellBody::new(-120.0, 90.0, -12.0)
            .corner_radius(-1.0)
            .seal_thickness(-0.2);
        assert!(body.normalize());
        assert_eq!(body.width_mm, 120.0);
        assert_eq!(body.thickness_mm, 12.0);
        assert_eq!(body.corner_radius_mm, 0.0);
        assert_eq!(body.seal_thickness_mm, 0.0);
        assert!(!body.normalize());
    }

    #[test]
    fn test_seal_margins() {
        let seals = SealMargins {
            left_mm: 4.0,
            right_mm: 6.0,
            top_mm: 3.5,
            bottom_mm: 10.0,
        };
        assert_eq!(seals.min_side_mm(), 4.0);
        assert_eq!(seals.min_mm(), 3.5);
        assert_eq!(SealMargins::uniform(5.0).min_mm(), 5.0);
    }

    #[test]
    fn test_limits_normalize() {
        let mut limits = ValidationLimits {
            min_seal_mm: f64::NAN,
            laminate_allowance_mm: -0.3,
            tab_edge_clearance_mm: 2.0,
        };
        assert!(limits.normalize());
        assert_eq!(limits.min_seal_mm, 0.0);
        assert_eq!(limits.laminate_allowance_mm, 0.0);
        assert_eq!(limits.tab_edge_clearance_mm, 2.0);
        assert!(!limits.normalize());
        assert!(!ValidationLimits::default().normalize());
    }
}
