//! Error taxonomy for the drawing engine.
//!
//! None of these are fatal. The interaction layer swallows them and keeps the
//! last consistent state; they exist so lower-level operations can report why
//! nothing happened.

use crate::store::{Collection, PathId};
use thiserror::Error;

/// Errors produced by core drawing and history operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// A stroke was finalized with too few points to be visible.
    #[error("stroke has {points} point(s), at least 2 are required")]
    InvalidGeometry { points: usize },
    /// Undo or redo was requested with nothing on the stack.
    #[error("nothing to {0}")]
    EmptyHistory(&'static str),
    /// A history entry names a path that is no longer where it should be.
    #[error("path {id} is not present in the {target} collection")]
    StalePathReference { id: PathId, target: Collection },
    /// A zoom bound, level or increment that is not strictly positive and finite.
    #[error("zoom value {0} is not usable")]
    DegenerateView(f64),
    /// An interpolation spacing that is not strictly positive and finite.
    #[error("interpolation step {0} must be positive and finite")]
    InvalidStep(f64),
}

/// Result type for core operations.
pub type SketchResult<T> = Result<T, SketchError>;
