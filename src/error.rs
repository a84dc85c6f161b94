use std::path::PathBuf;

/// Errors surfaced while loading the datasets or answering a query.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The input file does not carry the columns the upstream pipeline promises.
    #[error("{} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    /// Header-only file, or every row was skipped during load.
    #[error("No monthly records loaded from {0}")]
    EmptyDataset(String),
    #[error("State '{0}' is not present in the monthly dataset")]
    UnknownState(String),
    /// The state exists but has no rows for the requested district.
    #[error("No monthly records for {district}, {state}")]
    NoData { state: String, district: String },
    #[error("Epsilon must be a positive finite number, got {0}")]
    InvalidEpsilon(f64),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
