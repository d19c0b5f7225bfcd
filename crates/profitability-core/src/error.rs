use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A required field absent from one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    /// Zero-based row position within the coverage batch.
    pub row: usize,
    pub field: String,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.field)
    }
}

#[derive(Debug, Error)]
pub enum ProfitabilityError {
    #[error("Missing required fields in {coverage} batch: {}", join_missing(.fields))]
    MissingFields {
        coverage: String,
        fields: Vec<MissingField>,
    },

    #[error("Invalid input in {coverage} batch, row {row}: {field}: {reason}")]
    InvalidInput {
        coverage: String,
        row: usize,
        field: String,
        reason: String,
    },

    #[error("Unsupported coverage: {0}")]
    UnsupportedCoverage(String),

    #[error("Invalid assumption: {field}: {reason}")]
    InvalidAssumption { field: String, reason: String },

    #[error("Arithmetic overflow in {coverage} batch: {context}")]
    Overflow { coverage: String, context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn join_missing(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for ProfitabilityError {
    fn from(e: serde_json::Error) -> Self {
        ProfitabilityError::SerializationError(e.to_string())
    }
}
