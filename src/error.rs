//! Error taxonomy for one analysis request and its HTTP mapping.

use thiserror::Error;

use crate::github::GithubError;
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Missing or malformed input; the message is shown to the user as-is.
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Server configuration error")]
    Configuration,

    /// Repository lookup returned a non-success status, passed through to the caller.
    #[error("Failed to fetch repository data")]
    UpstreamFetch { status: u16 },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Failed to generate suggestions")]
    Generation,

    #[error("Unexpected error while analyzing repository")]
    Internal(String),
}

impl AnalyzeError {
    pub const MISSING_URL: AnalyzeError = AnalyzeError::InvalidInput("Repository URL is required");
    pub const INVALID_URL: AnalyzeError = AnalyzeError::InvalidInput("Invalid GitHub URL format");
    pub const MALFORMED_BODY: AnalyzeError =
        AnalyzeError::InvalidInput("Request body must be a JSON object with a repoUrl field");

    pub fn status(&self) -> u16 {
        match self {
            AnalyzeError::InvalidInput(_) => 400,
            AnalyzeError::Configuration => 500,
            AnalyzeError::UpstreamFetch { status } => *status,
            AnalyzeError::RateLimited => 429,
            AnalyzeError::Generation => 500,
            AnalyzeError::Internal(_) => 500,
        }
    }

    /// Stable slug the client uses to pick a message per error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::InvalidInput(_) => "invalid_input",
            AnalyzeError::Configuration => "configuration",
            AnalyzeError::UpstreamFetch { .. } => "upstream_fetch",
            AnalyzeError::RateLimited => "rate_limited",
            AnalyzeError::Generation => "generation_failed",
            AnalyzeError::Internal(_) => "internal",
        }
    }
}

impl From<GithubError> for AnalyzeError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::Status { status, .. } => AnalyzeError::UpstreamFetch { status },
            other => AnalyzeError::Internal(other.to_string()),
        }
    }
}

impl From<LlmError> for AnalyzeError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited => AnalyzeError::RateLimited,
            _ => AnalyzeError::Generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AnalyzeError::MISSING_URL.status(), 400);
        assert_eq!(AnalyzeError::INVALID_URL.status(), 400);
        assert_eq!(AnalyzeError::Configuration.status(), 500);
        assert_eq!(AnalyzeError::UpstreamFetch { status: 404 }.status(), 404);
        assert_eq!(AnalyzeError::RateLimited.status(), 429);
        assert_eq!(AnalyzeError::Generation.status(), 500);
        assert_eq!(AnalyzeError::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn test_messages_hide_internal_detail() {
        let err = AnalyzeError::Internal("connection reset by peer at 10.0.0.1".into());
        assert!(!err.to_string().contains("10.0.0.1"));
        assert_eq!(
            AnalyzeError::UpstreamFetch { status: 403 }.to_string(),
            "Failed to fetch repository data"
        );
    }

    #[test]
    fn test_rate_limit_message_mentions_rate_limit() {
        let msg = AnalyzeError::RateLimited.to_string().to_lowercase();
        assert!(msg.contains("rate limit"));
    }

    #[test]
    fn test_from_github_status_passes_through() {
        let err: AnalyzeError = GithubError::Status {
            status: 404,
            body: "Not Found".into(),
        }
        .into();
        assert_eq!(err.status(), 404);
        assert_eq!(err.kind(), "upstream_fetch");
    }

    #[test]
    fn test_from_llm_errors() {
        let err: AnalyzeError = LlmError::RateLimited.into();
        assert_eq!(err.status(), 429);

        let err: AnalyzeError = LlmError::Status {
            status: 502,
            body: "bad gateway".into(),
        }
        .into();
        assert_eq!(err.status(), 500);
        assert_eq!(err.kind(), "generation_failed");

        let err: AnalyzeError = LlmError::EmptyResponse.into();
        assert_eq!(err.status(), 500);
    }
}
