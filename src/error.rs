use thiserror::Error;

/// Failures raised by the metrics engine.
///
/// None of these are retryable: every computation is deterministic, so the
/// caller is expected to surface the message and move on.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// The record cannot produce a defined value, e.g. zero total classes.
    #[error("invalid record for {name}: {reason}")]
    InvalidRecord { name: String, reason: String },

    /// A trend needs at least two semester scores.
    #[error("insufficient data for {name}: need at least 2 semester scores, found {found}")]
    InsufficientData { name: String, found: usize },

    /// A class summary was requested over zero records.
    #[error("no student records to summarize")]
    EmptyDataset,
}

impl MetricsError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        MetricsError::InvalidRecord {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
