//! Error types for the diff engine.

use vdiff_types::{InspectError, Type};

/// Errors that abort a comparison.
///
/// Disagreements between the two values are never errors; they are reported
/// as diff lines. These variants cover broken inputs and failing sinks.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Two map keys of a type that can never be a map key had to be matched
    /// (sequences, maps, functions).
    #[error("invalid map key type {ty}")]
    InvalidMapKey { ty: Type },

    /// The output stream rejected a line.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be inspected.
    #[error("inspect error: {0}")]
    Inspect(#[from] InspectError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
