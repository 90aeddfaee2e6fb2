use std::path::PathBuf;

use thiserror::Error;

use crate::layout::CanvasError;

/// Errors that can occur while building, rendering or writing an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The first violated constraint of the validation gate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The canvas failed to measure or draw part of the document.
    #[error("layout failed at {context}: {source}")]
    Layout {
        /// Which block or row was being laid out (e.g. "item row 3").
        context: String,
        #[source]
        source: CanvasError,
    },

    /// The finished document could not be persisted.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be encoded into its final byte stream.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Structured export or import failed.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InvoiceError {
    pub(crate) fn layout(context: impl Into<String>, source: CanvasError) -> Self {
        Self::Layout {
            context: context.into(),
            source,
        }
    }
}

/// Name of the rule a [`ValidationError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// A mandatory field is empty or missing.
    Required,
    /// A numeric input is negative.
    NonNegative,
    /// A numeric input or collection exceeds the supported range.
    OutOfRange,
    /// Emission, operation and due dates are out of order.
    DateOrder,
    /// A sequence that must contain at least one element is empty.
    NonEmpty,
    /// The record was written for an unsupported schema revision.
    SchemaVersion,
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NonNegative => "non-negative",
            Self::OutOfRange => "out-of-range",
            Self::DateOrder => "date-order",
            Self::NonEmpty => "non-empty",
            Self::SchemaVersion => "schema-version",
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single validation failure with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "issuer.address.zip_code").
    pub field: String,
    /// The violated rule.
    pub constraint: Constraint,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.constraint, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        constraint: Constraint,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    /// Prefix the field path, used when a nested record is checked as part
    /// of its parent (`address.city` becomes `issuer.address.city`).
    pub(crate) fn within(mut self, prefix: &str) -> Self {
        self.field = format!("{prefix}.{}", self.field);
        self
    }
}
