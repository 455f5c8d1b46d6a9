//! Geometry primitives and the footprint outline builder.
//!
//! - [`PointF`] - planar point in millimetres
//! - [`Line`] - straight segment between two points
//! - [`BoundingBoxF`] - axis-aligned bounds of an outline
//! - [`Footprint`] - closed rounded-rectangle outline made of line segments

mod bounding_box;
mod footprint;
mod line;
mod point;

pub use bounding_box::BoundingBoxF;
pub use footprint::{
    build_footprint, build_footprint_with_segments, clamp_corner_radius, Footprint,
    DEFAULT_SEGMENTS_PER_ARC, MIN_EXTENT, MIN_SEGMENTS_PER_ARC,
};
pub use line::Line;
pub use point::PointF;
