//! Configuration module for cell design parameters.
//!
//! This module provides the serializable parameter groups of a design and
//! the [`CellDesign`] aggregate that loads and saves them as JSON.

mod body;
mod design;

pub use body::{CellBody, CellType, SealMargins, ValidationLimits};
pub use design::CellDesign;
