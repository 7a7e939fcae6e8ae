use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;

/// Default location of the published graft dataset.
pub const DEFAULT_SOURCE: &str = "https://storage.googleapis.com/lindyscore/Files.zip";

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Where the dataset comes from: a remote HTTPS URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("source must not be empty".to_string());
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Source::Url(s.to_string()))
        } else {
            Ok(Source::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What to do with a CSV row that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RowPolicy {
    /// Skip the row, log a warning, keep going.
    #[default]
    Skip,
    /// Abort the whole parse on the first bad row.
    Abort,
}

/// What to do with a record that violates numeric preconditions
/// (e.g. a negative complication count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecordPolicy {
    /// Fail the whole request. A silently shrunken result set is worse
    /// than a visible error, so this is the default.
    #[default]
    Reject,
    /// Drop the record from the result set, log a warning.
    Drop,
}

/// Request-scoped runtime settings. Passed explicitly into the pipeline;
/// nothing is read from ambient globals past the CLI boundary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Source,
    pub row_policy: RowPolicy,
    pub record_policy: RecordPolicy,
}

impl Settings {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            row_policy: RowPolicy::default(),
            record_policy: RecordPolicy::default(),
        }
    }
}
