//! Typed failures raised while loading payment data and rendering the page.
//!
//! Loading and rendering never recover locally; every error travels up to the
//! host adapter, which aborts the render pass and reports the chain.

use thiserror::Error;

/// The CSV header does not carry a column the aggregations depend on.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column '{column}' is missing (found: {found})")]
    MissingColumn { column: String, found: String },
}

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("invalid data location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("failed to read {location}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to decode text with encoding {encoding}")]
    Decode { encoding: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    Malformed {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A grouped sum left the range `Decimal` can represent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("sum of payment_value overflows for group '{group}'")]
    Overflow { group: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render dashboard template")]
    Template(#[from] tera::Error),
}
