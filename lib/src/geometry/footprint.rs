//! Rounded-rectangle footprint builder.
//!
//! The footprint of a cell body is a rectangle centred on the origin whose
//! four corners are rounded with circular arcs. The outline is emitted as a
//! closed sequence of straight segments only; arcs are tessellated into
//! `segments_per_arc` chords.
//!
//! ```text
//!            top edge (traversed right -> left)
//!        TL  ______________________  TR
//!          /                        \
//!  left   |            +             |  right
//!  edge   |         (0, 0)           |  edge
//!          \________________________/
//!        BL                          BR
//!            bottom edge (left -> right)
//! ```
//!
//! Traversal is counter-clockwise starting with the top edge, and every
//! corner is swept with increasing angle:
//! TL `π/2 → π`, BL `π → 3π/2`, BR `3π/2 → 2π`, TR `0 → π/2`.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BoundingBoxF, Line, PointF};
use crate::{CoordF, EPSILON};

/// Default number of chords used per rounded corner.
pub const DEFAULT_SEGMENTS_PER_ARC: usize = 16;

/// Minimum number of chords per rounded corner.
pub const MIN_SEGMENTS_PER_ARC: usize = 2;

/// Smallest body extent accepted by the builder (mm).
pub const MIN_EXTENT: CoordF = 1.0;

/// A closed outline made of straight segments lying in the XY plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    segments: Vec<Line>,
    length: CoordF,
    width: CoordF,
    radius: CoordF,
    segments_per_arc: usize,
}

impl Footprint {
    /// The ordered segments of the outline.
    #[inline]
    pub fn segments(&self) -> &[Line] {
        &self.segments
    }

    /// Number of segments (`4 + 4 · segments_per_arc`).
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The x extent after clamping (mm).
    #[inline]
    pub fn length(&self) -> CoordF {
        self.length
    }

    /// The y extent after clamping (mm).
    #[inline]
    pub fn width(&self) -> CoordF {
        self.width
    }

    /// The corner radius actually used after clamping (mm).
    #[inline]
    pub fn effective_radius(&self) -> CoordF {
        self.radius
    }

    /// Chords used per corner.
    #[inline]
    pub fn segments_per_arc(&self) -> usize {
        self.segments_per_arc
    }

    /// Start point of every segment, in traversal order.
    pub fn points(&self) -> Vec<PointF> {
        self.segments.iter().map(|s| s.a).collect()
    }

    /// Check that every segment ends where the next one starts, including the
    /// wrap from the last segment back to the first.
    pub fn is_closed(&self) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let n = self.segments.len();
        (0..n).all(|i| {
            let next = &self.segments[(i + 1) % n];
            self.segments[i].b.approx_eq(&next.a, EPSILON)
        })
    }

    /// Total outline length (mm).
    pub fn perimeter(&self) -> CoordF {
        self.segments.iter().map(Line::length).sum()
    }

    /// Signed enclosed area (mm²). Positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> CoordF {
        let sum: CoordF = self.segments.iter().map(|s| s.a.cross(&s.b)).sum();
        sum * 0.5
    }

    /// Bounding box of the outline.
    pub fn bounding_box(&self) -> BoundingBoxF {
        BoundingBoxF::from_points(self.segments.iter().flat_map(|s| [s.a, s.b]))
    }
}

/// Clamp a requested corner radius into `[0, 0.5 · min(length, width)]`.
#[inline]
pub fn clamp_corner_radius(length: CoordF, width: CoordF, radius: CoordF) -> CoordF {
    let max_radius = 0.5 * length.min(width);
    radius.min(max_radius).max(0.0)
}

/// Build the footprint with the default tessellation of 16 chords per corner.
///
/// `length` is the x extent, `width` the y extent. Both are clamped to at
/// least 1 mm and the radius is clamped with [`clamp_corner_radius`].
pub fn build_footprint(length: CoordF, width: CoordF, corner_radius: CoordF) -> Footprint {
    build_footprint_with_segments(length, width, corner_radius, DEFAULT_SEGMENTS_PER_ARC)
}

/// Build the footprint with an explicit number of chords per corner
/// (at least [`MIN_SEGMENTS_PER_ARC`]).
pub fn build_footprint_with_segments(
    length: CoordF,
    width: CoordF,
    corner_radius: CoordF,
    segments_per_arc: usize,
) -> Footprint {
    let _span = tracing::debug_span!(
        "build_footprint",
        length,
        width,
        corner_radius,
        segments_per_arc
    )
    .entered();

    let length = length.max(MIN_EXTENT);
    let width = width.max(MIN_EXTENT);
    let r = clamp_corner_radius(length, width, corner_radius);
    if r != corner_radius {
        debug!(requested = corner_radius, used = r, "corner radius clamped");
    }
    let n = segments_per_arc.max(MIN_SEGMENTS_PER_ARC);

    let hx = 0.5 * length;
    let hy = 0.5 * width;

    // Corner centres
    let c_tr = PointF::new(hx - r, hy - r);
    let c_tl = PointF::new(-hx + r, hy - r);
    let c_bl = PointF::new(-hx + r, -hy + r);
    let c_br = PointF::new(hx - r, -hy + r);

    // Edge endpoints
    let top_r = PointF::new(hx - r, hy);
    let top_l = PointF::new(-hx + r, hy);
    let left_t = PointF::new(-hx, hy - r);
    let left_b = PointF::new(-hx, -hy + r);
    let bot_l = PointF::new(-hx + r, -hy);
    let bot_r = PointF::new(hx - r, -hy);
    let right_b = PointF::new(hx, -hy + r);
    let right_t = PointF::new(hx, hy - r);

    let mut segments = Vec::with_capacity(4 + 4 * n);

    segments.push(Line::new(top_r, top_l));
    push_arc(&mut segments, c_tl, r, FRAC_PI_2, PI, n);

    segments.push(Line::new(left_t, left_b));
    push_arc(&mut segments, c_bl, r, PI, 1.5 * PI, n);

    segments.push(Line::new(bot_l, bot_r));
    push_arc(&mut segments, c_br, r, 1.5 * PI, 2.0 * PI, n);

    segments.push(Line::new(right_b, right_t));
    push_arc(&mut segments, c_tr, r, 0.0, FRAC_PI_2, n);

    Footprint {
        segments,
        length,
        width,
        radius: r,
        segments_per_arc: n,
    }
}

/// Tessellate the arc from `a0` to `a1` into `n` chords: sample `n + 1`
/// equally spaced angles and connect consecutive samples.
fn push_arc(dst: &mut Vec<Line>, center: PointF, radius: CoordF, a0: CoordF, a1: CoordF, n: usize) {
    let da = (a1 - a0) / n as CoordF;
    let mut prev = PointF::on_circle(center, radius, a0);
    for i in 1..=n {
        let cur = PointF::on_circle(center, radius, a0 + i as CoordF * da);
        dst.push(Line::new(prev, cur));
        prev = cur;
    }
}
