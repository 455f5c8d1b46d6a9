//! # Sheet Dimension Derivation
//!
//! Electrode sheets are dimensioned outward from the cathode:
//!
//! ```text
//! anode     = cathode + 2 · anode offset        (per axis)
//! separator = anode   + 2 · separator offset    (per axis)
//! ```
//!
//! The stack envelope (compressed footprint of the assembled stack) either
//! tracks the sheets, clamped between anode and separator on each axis, or is
//! a free user value.
//!
//! [`derive_dimensions`] is the pure form of the model. [`SheetModel`] owns a
//! parameter set and keeps the derived [`SheetSet`] in step with every write.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CoordF};

/// Dimensions of one rectangular sheet (mm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetDims {
    pub height_mm: CoordF,
    pub width_mm: CoordF,
}

impl SheetDims {
    #[inline]
    pub const fn new(height_mm: CoordF, width_mm: CoordF) -> Self {
        Self {
            height_mm,
            width_mm,
        }
    }

    /// Sheet area in cm² (`height · width / 100`).
    #[inline]
    pub fn area_cm2(&self) -> CoordF {
        self.height_mm * self.width_mm / 100.0
    }

    /// Grow symmetrically by `offset` on each side of each axis.
    #[inline]
    pub fn grown_by(&self, offset: &AxisOffset) -> Self {
        Self {
            height_mm: self.height_mm + 2.0 * offset.y_mm,
            width_mm: self.width_mm + 2.0 * offset.x_mm,
        }
    }

    /// Whether this sheet covers `other` on both axes.
    #[inline]
    pub fn covers(&self, other: &SheetDims) -> bool {
        self.height_mm >= other.height_mm && self.width_mm >= other.width_mm
    }
}

/// Per-axis offset from one sheet's edge to the next sheet's edge (mm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisOffset {
    /// Offset along the height axis.
    pub y_mm: CoordF,
    /// Offset along the width axis.
    pub x_mm: CoordF,
}

impl AxisOffset {
    /// Create an offset; negative components are clamped to zero.
    pub fn new(y_mm: CoordF, x_mm: CoordF) -> Self {
        Self {
            y_mm: non_negative(y_mm),
            x_mm: non_negative(x_mm),
        }
    }
}

/// The chain of offsets from cathode to anode to separator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetOffsets {
    pub anode: AxisOffset,
    pub separator: AxisOffset,
}

impl Default for SheetOffsets {
    fn default() -> Self {
        Self {
            anode: AxisOffset::new(1.0, 1.0),
            separator: AxisOffset::new(2.85, 2.0),
        }
    }
}

/// The three derived sheets of an electrode stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSet {
    pub cathode: SheetDims,
    pub anode: SheetDims,
    pub separator: SheetDims,
}

impl SheetSet {
    /// Derive anode and separator from the cathode and offset chain.
    pub fn derive(cathode: SheetDims, offsets: &SheetOffsets) -> Self {
        let anode = cathode.grown_by(&offsets.anode);
        let separator = anode.grown_by(&offsets.separator);
        Self {
            cathode,
            anode,
            separator,
        }
    }

    /// Anode ⊇ cathode and separator ⊇ anode on both axes.
    pub fn is_nested(&self) -> bool {
        self.anode.covers(&self.cathode) && self.separator.covers(&self.anode)
    }
}

/// Compressed footprint of the assembled electrode stack (mm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackEnvelope {
    pub height_mm: CoordF,
    pub width_mm: CoordF,
}

impl StackEnvelope {
    #[inline]
    pub const fn new(height_mm: CoordF, width_mm: CoordF) -> Self {
        Self {
            height_mm,
            width_mm,
        }
    }

    /// Clamp each axis between the anode (lower) and separator (upper) sheet.
    pub fn clamped_to(&self, sheets: &SheetSet) -> Self {
        Self {
            height_mm: clamp_between(
                self.height_mm,
                sheets.anode.height_mm,
                sheets.separator.height_mm,
            ),
            width_mm: clamp_between(
                self.width_mm,
                sheets.anode.width_mm,
                sheets.separator.width_mm,
            ),
        }
    }
}

/// Clamp into `[min, max]`, applying the lower bound first.
///
/// Unlike `f64::clamp` this never panics when `min > max`; the upper bound
/// wins in that case.
#[inline]
fn clamp_between(value: CoordF, min: CoordF, max: CoordF) -> CoordF {
    let mut v = value;
    if v < min {
        v = min;
    }
    if v > max {
        v = max;
    }
    v
}

/// Input parameters of the sheet model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetParameters {
    pub cathode_height_mm: CoordF,
    pub cathode_width_mm: CoordF,
    pub offsets: SheetOffsets,
    /// Stored stack envelope. Clamped on write while `auto_track_stack` is on.
    pub stack: StackEnvelope,
    /// Keep the stack envelope between anode and separator dimensions.
    pub auto_track_stack: bool,
}

impl Default for SheetParameters {
    fn default() -> Self {
        Self {
            cathode_height_mm: 375.5,
            cathode_width_mm: 79.0,
            offsets: SheetOffsets::default(),
            stack: StackEnvelope::new(380.0, 83.0),
            auto_track_stack: true,
        }
    }
}

impl SheetParameters {
    /// Cathode dimensions.
    #[inline]
    pub fn cathode(&self) -> SheetDims {
        SheetDims::new(self.cathode_height_mm, self.cathode_width_mm)
    }

    /// Negative cathode dimensions take their absolute value; negative offsets
    /// become zero. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();
        self.cathode_height_mm = self.cathode_height_mm.abs();
        self.cathode_width_mm = self.cathode_width_mm.abs();
        self.offsets.anode = AxisOffset::new(self.offsets.anode.y_mm, self.offsets.anode.x_mm);
        self.offsets.separator =
            AxisOffset::new(self.offsets.separator.y_mm, self.offsets.separator.x_mm);
        *self != before
    }
}

/// Derive the sheet set and the effective stack envelope.
///
/// With auto-track enabled the returned envelope is clamped between the anode
/// and separator dimensions; otherwise the stored value is returned as is.
pub fn derive_dimensions(params: &SheetParameters) -> (SheetSet, StackEnvelope) {
    let sheets = SheetSet::derive(params.cathode(), &params.offsets);
    let stack = if params.auto_track_stack {
        params.stack.clamped_to(&sheets)
    } else {
        params.stack
    };
    (sheets, stack)
}

/// Stateful sheet model with recompute-on-write semantics.
///
/// Every setter clamps its input, recomputes the derived sheets and, when
/// auto-track is enabled, re-clamps the stored stack envelope before it
/// returns. Readers can never observe a derived value older than the latest
/// write.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetModel {
    params: SheetParameters,
    sheets: SheetSet,
}

impl Default for SheetModel {
    fn default() -> Self {
        Self::new(SheetParameters::default())
    }
}

impl SheetModel {
    /// Create a model from parameters, normalizing them first.
    pub fn new(mut params: SheetParameters) -> Self {
        params.normalize();
        let mut model = Self {
            sheets: SheetSet::derive(params.cathode(), &params.offsets),
            params,
        };
        model.refresh();
        model
    }

    /// Current input parameters (stack envelope as stored).
    #[inline]
    pub fn parameters(&self) -> &SheetParameters {
        &self.params
    }

    /// Derived sheets, consistent with the latest write.
    #[inline]
    pub fn sheets(&self) -> &SheetSet {
        &self.sheets
    }

    /// Stored stack envelope.
    #[inline]
    pub fn stack(&self) -> StackEnvelope {
        self.params.stack
    }

    #[inline]
    pub fn auto_track_stack(&self) -> bool {
        self.params.auto_track_stack
    }

    pub fn set_cathode_height(&mut self, value: CoordF) {
        self.params.cathode_height_mm = clamped("cathode_height_mm", value);
        self.refresh();
    }

    pub fn set_cathode_width(&mut self, value: CoordF) {
        self.params.cathode_width_mm = clamped("cathode_width_mm", value);
        self.refresh();
    }

    pub fn set_anode_offset_y(&mut self, value: CoordF) {
        self.params.offsets.anode.y_mm = clamped("anode_offset_y_mm", value);
        self.refresh();
    }

    pub fn set_anode_offset_x(&mut self, value: CoordF) {
        self.params.offsets.anode.x_mm = clamped("anode_offset_x_mm", value);
        self.refresh();
    }

    pub fn set_separator_offset_y(&mut self, value: CoordF) {
        self.params.offsets.separator.y_mm = clamped("separator_offset_y_mm", value);
        self.refresh();
    }

    pub fn set_separator_offset_x(&mut self, value: CoordF) {
        self.params.offsets.separator.x_mm = clamped("separator_offset_x_mm", value);
        self.refresh();
    }

    /// Store a stack height, clamped if auto-track is enabled.
    pub fn set_stack_height(&mut self, value: CoordF) {
        self.params.stack.height_mm = value;
        self.refresh();
    }

    /// Store a stack width, clamped if auto-track is enabled.
    pub fn set_stack_width(&mut self, value: CoordF) {
        self.params.stack.width_mm = value;
        self.refresh();
    }

    /// Toggle auto-tracking. Enabling re-clamps the stored envelope at once.
    pub fn set_auto_track_stack(&mut self, enabled: bool) {
        self.params.auto_track_stack = enabled;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.sheets = SheetSet::derive(self.params.cathode(), &self.params.offsets);
        if self.params.auto_track_stack {
            let clamped = self.params.stack.clamped_to(&self.sheets);
            if clamped != self.params.stack {
                debug!(
                    from = ?self.params.stack,
                    to = ?clamped,
                    "stack envelope re-clamped to sheets"
                );
            }
            self.params.stack = clamped;
        }
    }
}

fn clamped(field: &'static str, value: CoordF) -> CoordF {
    let v = non_negative(value);
    if v != value {
        debug!(field, value, "negative input clamped to zero");
    }
    v
}
