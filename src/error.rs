use thiserror::Error;

pub type Result<T> = std::result::Result<T, LindyError>;

/// Failure taxonomy for the load-and-score pipeline.
///
/// Each variant maps to one stage: retrieval, archive inspection, CSV
/// parsing, schema validation, and per-record numeric preconditions.
/// Nothing is retried; every variant surfaces to the request boundary.
#[derive(Debug, Error)]
pub enum LindyError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("invalid record '{graft_type}': {reason}")]
    InvalidRecord { graft_type: String, reason: String },
}

impl LindyError {
    /// Stable machine-readable code for each failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::InvalidRecord { .. } => "INVALID_RECORD",
        }
    }
}

impl From<reqwest::Error> for LindyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Fetch(e.to_string())
    }
}

impl From<zip::result::ZipError> for LindyError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e.to_string())
    }
}

impl From<csv::Error> for LindyError {
    fn from(e: csv::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
