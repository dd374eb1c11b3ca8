use thiserror::Error;

/// Failure while writing an export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV generation error: {0}")]
    Csv(#[from] csv::Error),
}
