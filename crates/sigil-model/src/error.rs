//! Argument conversion errors

use thiserror::Error;

/// Errors raised while converting declared arguments into attribute fields
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgError {
    /// A required argument was not supplied
    #[error("missing required argument: {name}")]
    Missing {
        /// Argument name
        name: String,
    },

    /// An argument was supplied with the wrong kind
    #[error("invalid argument {name}: expected {expected}, got {actual}")]
    Invalid {
        /// Argument name
        name: String,
        /// Expected kind
        expected: &'static str,
        /// Supplied kind
        actual: &'static str,
    },

    /// A named argument does not belong to the parameter list
    #[error("unknown argument: {name}")]
    Unknown {
        /// Argument name
        name: String,
    },
}
