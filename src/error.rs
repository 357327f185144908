use thiserror::Error;

/// Everything that can abort a graph build.
///
/// Numeric anomalies inside a row (unparseable cells, zero-variance pairs) are
/// absorbed where they occur and never show up here.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    #[error("insufficient data: {retained} row(s) survived filtering, at least 2 are needed")]
    InsufficientData { retained: usize },

    #[error("dimension mismatch: {labels} labels for a {dimension}x{dimension} score matrix")]
    DimensionMismatch { labels: usize, dimension: usize },

    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
