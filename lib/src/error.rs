//! Error types.
//!
//! Infeasible designs are not errors: they are reported as findings by the
//! [`crate::validation`] module. These variants cover loading design files
//! and structural misuse of the API.

use thiserror::Error;

/// Errors produced while loading, saving or editing a design.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A layer edit addressed a position outside the stack.
    #[error("Layer index {index} out of range (stack has {len} layers)")]
    LayerIndex { index: usize, len: usize },
}

/// Result type for design operations.
pub type DesignResult<T> = Result<T, DesignError>;
