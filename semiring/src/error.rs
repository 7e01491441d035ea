use crate::Float;
use thiserror::Error;

/// The errors produced when operating over a semiring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemiringError {
    /// The shapes of the operands are not compatible with the operation
    #[error("dimension mismatch in {operation}: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// The name of the operation that failed
        operation: &'static str,
        /// The (rows, columns) of the left operand
        left: (usize, usize),
        /// The (rows, columns) of the right operand
        right: (usize, usize),
    },

    /// A value that is neither finite nor the absorbing element
    #[error("invalid semiring value: {value}")]
    InvalidValue {
        /// The rejected value
        value: Float,
    },

    /// The closure does not exist because of a cycle with positive
    /// (max-plus) or negative (min-plus) weight.
    #[error("closure diverges: vertex {vertex} lies on a cycle heavier than the unit element")]
    DivergentSemiring {
        /// A vertex on the divergent cycle
        vertex: usize,
    },

    /// A row has no finite entry, so no cycle can be reached from it
    #[error("spectrum is undefined: row {row} has no finite entry")]
    UndefinedSpectrum {
        /// The absorbing row
        row: usize,
    },

    /// A single eigenvalue was requested for a matrix whose vertices
    /// reach cycles of different mean weights
    #[error("spectrum is ambiguous: cycle times range from {min} to {max}")]
    AmbiguousSpectrum {
        /// The smallest cycle time found
        min: Float,
        /// The largest cycle time found
        max: Float,
    },

    /// An iterative algorithm did not reach its fixed point within the
    /// allowed number of iterations
    #[error("no fixed point after {iterations} iterations")]
    IterationLimit {
        /// The number of iterations performed
        iterations: usize,
    },

    /// An element was accessed outside of the matrix
    #[error("element ({row},{col}) is out of bounds of a {nrows} by {ncols} matrix")]
    IndexOutOfBounds {
        /// The requested row
        row: usize,
        /// The requested column
        col: usize,
        /// The rows in the matrix
        nrows: usize,
        /// The columns in the matrix
        ncols: usize,
    },
}

/// Result type for semiring operations.
pub type Result<T> = std::result::Result<T, SemiringError>;
