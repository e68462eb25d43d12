// Error types for the resolve/download flow

use std::fmt;

/// Failure modes surfaced to the presentation shell.
///
/// Every collaborator call is wrapped where it is made and re-raised as the
/// calling component's kind, carrying the underlying message for display.
/// A declined confirmation is not an error (see `DownloadOutcome::Cancelled`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrabError {
    /// The link was empty or whitespace-only
    InvalidInput,

    /// No catalog loaded, or the placeholder/sentinel entry was selected
    NoSelection,

    /// Metadata query failed while discovering resolutions
    Resolve(String),

    /// Size probe, directory creation, or fetch/merge failed
    Download(String),
}

impl fmt::Display for GrabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "Please enter a valid video link."),
            Self::NoSelection => write!(
                f,
                "Please load and select a resolution before downloading."
            ),
            Self::Resolve(msg) => {
                write!(f, "An error occurred while fetching resolutions: {}", msg)
            }
            Self::Download(msg) => write!(f, "An error occurred: {}", msg),
        }
    }
}

impl std::error::Error for GrabError {}

/// Errors raised by a `MediaExtractor` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// yt-dlp (or the configured merge tool) could not be found
    ToolNotFound(String),

    /// The extractor process failed or reported a non-zero exit
    ExecutionFailed(String),

    /// Extractor output could not be parsed
    Parse(String),

    /// The extractor did not answer within the configured timeout
    TimedOut(u64),
}

impl fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::ExecutionFailed(msg) => write!(f, "Execution error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::TimedOut(secs) => write!(f, "Timed out after {}s", secs),
        }
    }
}

impl std::error::Error for ExtractorError {}
