//! # Cell Geometry
//!
//! Parametric geometry engine for multi-layer battery cells (pouch or
//! prismatic). Given a set of design parameters it:
//!
//! - derives dependent sheet dimensions (cathode → anode → separator → stack)
//! - validates manufacturability constraints (seal margins, tab fit, corner
//!   radius, overlap) into a flat list of [`validation::Finding`]s
//! - aggregates laminated packaging materials into effective properties
//! - builds a 2D footprint outline for visual inspection
//!
//! All units are millimetres unless a field name says otherwise
//! (`_um`, `_cm2`, `_g_cm3`, `_mg_cm2`).
//!
//! ## Example
//!
//! ```
//! use cell_geometry::config::CellDesign;
//! use cell_geometry::session::DesignSession;
//!
//! let mut session = DesignSession::from_design(CellDesign::default());
//! session.set_anode_offset_x(1.5);
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.sheets.anode.width_mm >= snapshot.sheets.cathode.width_mm);
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod geometry;
pub mod laminate;
pub mod session;
pub mod sheet;
pub mod stack;
pub mod tabs;
pub mod validation;

pub use error::{DesignError, DesignResult};

/// Floating-point coordinate / length type (millimetres).
pub type CoordF = f64;

/// Tolerance used when comparing derived lengths (mm).
pub const EPSILON: CoordF = 1e-9;

/// Clamp a scalar input to be non-negative.
///
/// NaN inputs are treated as zero.
#[inline]
pub fn non_negative(value: CoordF) -> CoordF {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}
