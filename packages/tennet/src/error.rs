//! Error types for the TenneT client.
//!
//! Uses the dual-error pattern: `TennetError` carries detailed context for
//! library consumers, while [`ErrorKind`] collapses it onto the three failure
//! classes a caller usually branches on (retrieval, parse, schema).

use thiserror::Error;

/// Coarse classification of a [`TennetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote endpoint could not be reached or answered with a non-2xx status.
    Retrieval,
    /// The payload was not well-formed or held unusable values.
    Parse,
    /// The payload does not match any known datetime column convention.
    Schema,
    /// The caller passed invalid arguments or configuration.
    Input,
}

/// Main error type for the client library.
#[derive(Debug, Error)]
pub enum TennetError {
    /// The endpoint answered with a non-successful HTTP status.
    #[error("Request to {url} failed with HTTP status {status}")]
    Retrieval { status: u16, url: String },

    /// HTTP transport failed before a status was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// A multi-day window returned no `<Record>` elements.
    #[error("No records returned for window {start} to {end}")]
    EmptyPayload { start: String, end: String },

    /// A cell could not be interpreted for its column.
    #[error("Invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },

    /// None of the datetime column conventions is present.
    #[error("No datetime column convention matches columns [{}]", .columns.join(", "))]
    Schema { columns: Vec<String> },

    /// A record has no `DATE` value to anchor its timestamp on.
    #[error("Record {row} has no DATE value")]
    MissingDate { row: usize },

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2023-01-15)")]
    InvalidDate(String),

    /// Start date lies after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TennetError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Retrieval { .. } | Self::Http(_) => ErrorKind::Retrieval,
            Self::XmlParse(_) | Self::EmptyPayload { .. } | Self::InvalidValue { .. } => {
                ErrorKind::Parse
            }
            Self::Schema { .. } | Self::MissingDate { .. } => ErrorKind::Schema,
            Self::InvalidDate(_) | Self::InvalidDateRange { .. } | Self::Config(_) => {
                ErrorKind::Input
            }
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, TennetError>;
