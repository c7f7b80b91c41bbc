use std::fmt;

use crate::core::constants;

/// Error types for wayprobe operations
#[derive(Debug)]
pub enum WayprobeError {
    /// IO error (report persistence, config files)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Run parameters rejected before any network activity
    Validation(String),

    /// Archive index query failed or returned nothing
    ListRetrieval(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// Regex compilation error
    Regex(regex::Error),

    /// A worker task could not be joined
    Worker(String),
}

impl fmt::Display for WayprobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WayprobeError::Io(err) => write!(f, "IO error: {err}"),
            WayprobeError::Config(msg) => write!(f, "Configuration error: {msg}"),
            WayprobeError::Validation(msg) => write!(f, "Validation error: {msg}"),
            WayprobeError::ListRetrieval(msg) => {
                write!(f, "Error retrieving archived URLs: {msg}")
            }
            WayprobeError::Http(err) => write!(f, "HTTP error: {err}"),
            WayprobeError::Json(err) => write!(f, "JSON error: {err}"),
            WayprobeError::Regex(err) => write!(f, "Regex error: {err}"),
            WayprobeError::Worker(msg) => write!(f, "Worker error: {msg}"),
        }
    }
}

impl std::error::Error for WayprobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WayprobeError::Io(err) => Some(err),
            WayprobeError::Http(err) => Some(err),
            WayprobeError::Json(err) => Some(err),
            WayprobeError::Regex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WayprobeError {
    fn from(err: std::io::Error) -> Self {
        WayprobeError::Io(err)
    }
}

impl From<reqwest::Error> for WayprobeError {
    fn from(err: reqwest::Error) -> Self {
        WayprobeError::Http(err)
    }
}

impl From<serde_json::Error> for WayprobeError {
    fn from(err: serde_json::Error) -> Self {
        WayprobeError::Json(err)
    }
}

impl From<regex::Error> for WayprobeError {
    fn from(err: regex::Error) -> Self {
        WayprobeError::Regex(err)
    }
}

/// Type alias for Results using WayprobeError
pub type Result<T> = std::result::Result<T, WayprobeError>;

/// Human readable cause of a failed request.
///
/// reqwest wraps the interesting failure (DNS, refused connection, TLS) a few
/// sources deep, so the innermost source is reported.
pub fn request_failure_cause(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return constants::error_messages::OPERATION_TIMED_OUT.to_string();
    }

    let mut cause = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        cause = inner.to_string();
        source = std::error::Error::source(inner);
    }
    cause
}
