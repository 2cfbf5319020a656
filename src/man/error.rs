use std::fmt;
use std::time::Duration;

/// Errors raised while resolving, fetching or enumerating manual pages.
///
/// `Display` renders the short, stable message shown to the user and kept
/// in the session error log. The underlying reason is carried alongside for
/// logging but never appears in that message, so the same failure always
/// produces the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManError {
    /// The query parsed to nothing
    EmptyQuery,
    /// The lookup tool reported that no page matches the query
    NotFound { query: String },
    /// The lookup tool could not be run, timed out, or exited unexpectedly
    ToolFailure { query: String, reason: String },
    /// The page resolved but its content could not be retrieved
    Fetch { title: String, reason: String },
    /// The manual tree could not be enumerated for random selection
    CatalogueUnavailable { reason: String },
}

impl ManError {
    /// The underlying cause, for logs.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ManError::ToolFailure { reason, .. }
            | ManError::Fetch { reason, .. }
            | ManError::CatalogueUnavailable { reason } => Some(reason),
            ManError::EmptyQuery | ManError::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for ManError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManError::EmptyQuery => write!(f, "Nothing to open"),
            ManError::NotFound { query } => write!(f, "{}: Not Found", query),
            ManError::ToolFailure { query, .. } => write!(f, "{}: An error occurred", query),
            ManError::Fetch { title, .. } => write!(f, "{}: An error occurred", title),
            ManError::CatalogueUnavailable { .. } => write!(f, "Manual pages directory unavailable"),
        }
    }
}

impl std::error::Error for ManError {}

/// Errors from running the external tool itself.
#[derive(Debug)]
pub enum InvokeError {
    /// The process could not be started
    Spawn(std::io::Error),
    /// Waiting on or reading from the process failed
    Io(std::io::Error),
    /// The process did not finish in time and was killed
    Timeout(Duration),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Spawn(e) => write!(f, "failed to start: {}", e),
            InvokeError::Io(e) => write!(f, "I/O error: {}", e),
            InvokeError::Timeout(limit) => write!(f, "timed out after {:?}", limit),
        }
    }
}

impl std::error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokeError::Spawn(e) | InvokeError::Io(e) => Some(e),
            InvokeError::Timeout(_) => None,
        }
    }
}
