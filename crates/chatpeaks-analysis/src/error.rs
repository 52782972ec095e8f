//! Analysis error types.

use thiserror::Error;

use chatpeaks_chat::ChatError;

/// Result type for analysis runs.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors an analysis run can surface to callers.
///
/// Budget exhaustion (page cap or wall clock) is not an error; partial
/// results come back as a successful report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Comment feed unavailable: {0}")]
    Upstream(#[source] ChatError),

    #[error("No chat messages found for this video")]
    NoData,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Machine-readable category for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput(_) => "invalid-input",
            AnalysisError::Upstream(_) => "upstream-unavailable",
            AnalysisError::NoData => "no-data",
            AnalysisError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AnalysisError::invalid_input("bad url").code(), "invalid-input");
        assert_eq!(
            AnalysisError::Upstream(ChatError::status(503, "")).code(),
            "upstream-unavailable"
        );
        assert_eq!(AnalysisError::NoData.code(), "no-data");
        assert_eq!(AnalysisError::Internal("boom".into()).code(), "internal");
    }
}
