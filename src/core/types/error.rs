//! Error types for Module-Bridge

use std::any::Any;
use thiserror::Error;

/// Main error type for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// A malformed, missing or mistyped call argument.
///
/// Raised before any provider interaction; no callback runs when decoding fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("{operation}: missing argument {index}")]
    Missing { operation: &'static str, index: usize },

    #[error("{operation}: argument {index} must be {expected}, got {actual}")]
    TypeMismatch {
        operation: &'static str,
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{operation}: argument {index} must not be empty")]
    Empty { operation: &'static str, index: usize },

    #[error("{operation}: invalid protection mask {mask:?}")]
    InvalidProtection { operation: &'static str, mask: String },

    #[error("{operation}: callbacks object is missing `{name}`")]
    MissingCallback {
        operation: &'static str,
        name: &'static str,
    },

    #[error("{operation}: `{name}` is not a function")]
    NotCallable {
        operation: &'static str,
        name: &'static str,
    },
}

impl ArgumentError {
    /// The operation whose arguments failed to decode
    pub fn operation(&self) -> &'static str {
        match self {
            ArgumentError::Missing { operation, .. }
            | ArgumentError::TypeMismatch { operation, .. }
            | ArgumentError::Empty { operation, .. }
            | ArgumentError::InvalidProtection { operation, .. }
            | ArgumentError::MissingCallback { operation, .. }
            | ArgumentError::NotCallable { operation, .. } => *operation,
        }
    }
}

/// An error raised by script code, as seen from the native side
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {message}")]
pub struct ScriptError {
    pub name: String,
    pub message: String,
}

impl ScriptError {
    /// A plain `Error`
    pub fn new(message: impl Into<String>) -> Self {
        ScriptError {
            name: "Error".to_string(),
            message: message.into(),
        }
    }

    /// A `TypeError`
    pub fn type_error(message: impl Into<String>) -> Self {
        ScriptError {
            name: "TypeError".to_string(),
            message: message.into(),
        }
    }

    /// Converts a caught panic payload into an `InternalError`
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "callback panicked".to_string()
        };

        ScriptError {
            name: "InternalError".to_string(),
            message,
        }
    }
}
