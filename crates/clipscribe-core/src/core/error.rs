//! ClipScribe Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::{document::SchemaViolation, LineId};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Field Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Import Errors
    // =========================================================================
    #[error("Canonical document failed validation ({} violations)", .violations.len())]
    SchemaError { violations: Vec<SchemaViolation> },

    #[error("Format error: {0}")]
    FormatError(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Precondition failed: {0}")]
    PreconditionError(String),

    #[error("Line not found: {0}")]
    LineNotFound(LineId),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
