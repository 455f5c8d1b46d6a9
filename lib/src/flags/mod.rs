//! # Flag Placement
//!
//! Cathode and anode current-collector flags either sit on opposite sides of
//! the sheet or share one edge. When they share an edge the anode flag must
//! start at least [`MIN_FLAG_GAP_MM`] after the cathode flag ends:
//!
//! ```text
//!  offset_c          offset_c + width_c   + gap
//!     |<--- cathode --->|<-- 2 mm -->|<--- anode --->|
//! ```
//!
//! The two placement modes are a single enum, so both can never be active.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CoordF};

/// Minimum clearance between two flags on the same edge (mm).
pub const MIN_FLAG_GAP_MM: CoordF = 2.0;

/// Where the two flags are placed relative to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagPlacement {
    #[default]
    OppositeSides,
    SameSide,
}

impl FlagPlacement {
    #[inline]
    pub fn is_same_side(self) -> bool {
        self == FlagPlacement::SameSide
    }

    #[inline]
    pub fn is_opposite_sides(self) -> bool {
        self == FlagPlacement::OppositeSides
    }
}

/// Geometry of one flag (mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagSpec {
    pub height_mm: CoordF,
    pub width_mm: CoordF,
    /// Distance from the sheet edge to the leading edge of the flag.
    pub offset_x_mm: CoordF,
}

impl Default for FlagSpec {
    fn default() -> Self {
        Self {
            height_mm: 12.0,
            width_mm: 64.0,
            offset_x_mm: 8.5,
        }
    }
}

impl FlagSpec {
    /// Position of the trailing edge along the shared edge.
    #[inline]
    pub fn trailing_edge_mm(&self) -> CoordF {
        self.offset_x_mm + self.width_mm
    }

    fn normalize(&mut self) -> bool {
        let before = *self;
        self.height_mm = non_negative(self.height_mm);
        self.width_mm = non_negative(self.width_mm);
        self.offset_x_mm = non_negative(self.offset_x_mm);
        *self != before
    }
}

/// Push the anode flag forward so it clears the cathode flag.
///
/// Only active when `same_side` is true. Returns the anode offset to use:
/// either the requested value, or exactly
/// `cathode_offset_x + cathode_width + MIN_FLAG_GAP_MM` when the requested
/// value is closer than that.
pub fn resolve_flag_overlap(
    cathode_offset_x: CoordF,
    cathode_width: CoordF,
    anode_offset_x: CoordF,
    same_side: bool,
) -> CoordF {
    if !same_side {
        return anode_offset_x;
    }
    let earliest = cathode_offset_x + cathode_width + MIN_FLAG_GAP_MM;
    if anode_offset_x < earliest {
        debug!(
            requested = anode_offset_x,
            adjusted = earliest,
            "anode flag pushed clear of cathode flag"
        );
        earliest
    } else {
        anode_offset_x
    }
}

/// Serializable flag parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagParameters {
    pub placement: FlagPlacement,
    pub cathode: FlagSpec,
    pub anode: FlagSpec,
}

impl FlagParameters {
    /// Clamp negative inputs to zero. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let c = self.cathode.normalize();
        let a = self.anode.normalize();
        c || a
    }
}

/// Flag layout that keeps same-side flags clear of each other on every write.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlagLayout {
    params: FlagParameters,
}

impl FlagLayout {
    /// Create a layout, normalizing and resolving the given parameters.
    pub fn new(mut params: FlagParameters) -> Self {
        params.normalize();
        let mut layout = Self { params };
        layout.resolve();
        layout
    }

    #[inline]
    pub fn parameters(&self) -> &FlagParameters {
        &self.params
    }

    #[inline]
    pub fn placement(&self) -> FlagPlacement {
        self.params.placement
    }

    #[inline]
    pub fn cathode(&self) -> &FlagSpec {
        &self.params.cathode
    }

    #[inline]
    pub fn anode(&self) -> &FlagSpec {
        &self.params.anode
    }

    #[inline]
    pub fn on_opposite_sides(&self) -> bool {
        self.params.placement.is_opposite_sides()
    }

    #[inline]
    pub fn on_same_side(&self) -> bool {
        self.params.placement.is_same_side()
    }

    pub fn set_placement(&mut self, placement: FlagPlacement) {
        self.params.placement = placement;
        self.resolve();
    }

    /// `true` selects opposite sides; `false` selects the same side.
    pub fn set_on_opposite_sides(&mut self, value: bool) {
        self.set_placement(if value {
            FlagPlacement::OppositeSides
        } else {
            FlagPlacement::SameSide
        });
    }

    /// `true` selects the same side; `false` selects opposite sides.
    pub fn set_on_same_side(&mut self, value: bool) {
        self.set_on_opposite_sides(!value);
    }

    pub fn set_cathode_height(&mut self, value: CoordF) {
        self.params.cathode.height_mm = non_negative(value);
        self.resolve();
    }

    pub fn set_cathode_width(&mut self, value: CoordF) {
        self.params.cathode.width_mm = non_negative(value);
        self.resolve();
    }

    pub fn set_cathode_offset_x(&mut self, value: CoordF) {
        self.params.cathode.offset_x_mm = non_negative(value);
        self.resolve();
    }

    pub fn set_anode_height(&mut self, value: CoordF) {
        self.params.anode.height_mm = non_negative(value);
        self.resolve();
    }

    pub fn set_anode_width(&mut self, value: CoordF) {
        self.params.anode.width_mm = non_negative(value);
        self.resolve();
    }

    pub fn set_anode_offset_x(&mut self, value: CoordF) {
        self.params.anode.offset_x_mm = non_negative(value);
        self.resolve();
    }

    /// Gap between the cathode trailing edge and the anode leading edge.
    /// Only meaningful for same-side placement.
    pub fn same_side_gap_mm(&self) -> Option<CoordF> {
        self.on_same_side()
            .then(|| self.params.anode.offset_x_mm - self.params.cathode.trailing_edge_mm())
    }

    /// Whether both flags end within an edge of the given span.
    pub fn fits_within(&self, span_mm: CoordF) -> bool {
        self.params.cathode.trailing_edge_mm() <= span_mm
            && self.params.anode.trailing_edge_mm() <= span_mm
    }

    fn resolve(&mut self) {
        let p = &mut self.params;
        p.anode.offset_x_mm = resolve_flag_overlap(
            p.cathode.offset_x_mm,
            p.cathode.width_mm,
            p.anode.offset_x_mm,
            p.placement.is_same_side(),
        );
    }
}
