// src/error.rs

use crate::scenario::ConstraintId;
use crate::time_value::TimeValue;

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Structural faults found while compiling a document into a runtime
/// graph. These are fatal at compile time and can never surface mid-tick:
/// a graph that fails validation is rejected before playback starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The graph has syncs but none of them is a start (no incoming
    /// constraints anywhere).
    #[error("scenario has no start sync")]
    NoStartSync,

    /// A constraint definition points at a sync index that does not exist.
    #[error("constraint {index} references unknown sync {sync}")]
    UnknownSync { index: usize, sync: usize },

    /// A runtime constraint references a sync that has been removed.
    #[error("constraint {constraint:?} references a removed sync")]
    DanglingSync { constraint: ConstraintId },

    /// Duration bounds are inverted.
    #[error("constraint {index} has min {min} above max {max}")]
    InvertedBounds {
        index: usize,
        min: TimeValue,
        max: TimeValue,
    },
}
