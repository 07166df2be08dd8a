use std::fmt::Display;

use thiserror::Error;

/// Errors produced while building inspected values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InspectError {
    /// A `Serialize` implementation reported a failure.
    #[error("serialization error: {0}")]
    Custom(String),

    #[error("pointer target already set")]
    PtrAlreadySet,

    #[error("cannot set the target of a null pointer")]
    NullPtr,
}

impl serde::ser::Error for InspectError {
    fn custom<T: Display>(msg: T) -> Self {
        InspectError::Custom(msg.to_string())
    }
}
