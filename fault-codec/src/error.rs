//! Error types for fault encoding and decoding

use thiserror::Error;

/// Errors that can occur while encoding or decoding a SOAP fault
#[derive(Debug, Error)]
pub enum FaultError {
    /// Schema emission is not implemented for this protocol version
    #[error("schema emission is not implemented for {0}")]
    SchemaUnsupported(&'static str),

    /// A required child element was absent from the fault
    #[error("missing required element: {0}")]
    MissingElement(&'static str),

    /// Writing a detail subtree back to markup failed
    #[error("XML write error: {0}")]
    Write(String),
}

/// Result type alias for codec operations
pub type FaultResult<T> = Result<T, FaultError>;
