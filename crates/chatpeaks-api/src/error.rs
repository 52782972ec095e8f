//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use chatpeaks_analysis::AnalysisError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    BadGateway(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable category for the error envelope.
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid-input",
            ApiError::NotFound(_) => "no-data",
            ApiError::BadGateway(_) => "upstream-unavailable",
            ApiError::RateLimited => "rate-limited",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AnalysisError::Upstream(source) => ApiError::BadGateway(source.to_string()),
            AnalysisError::NoData => ApiError::NotFound(e.to_string()),
            AnalysisError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay out of production responses
        let detail = match &self {
            ApiError::Internal(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatpeaks_chat::ChatError;

    #[test]
    fn test_analysis_errors_map_to_status_and_code() {
        let e: ApiError = AnalysisError::invalid_input("bad url").into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.code(), "invalid-input");

        let e: ApiError = AnalysisError::NoData.into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.code(), "no-data");

        let e: ApiError = AnalysisError::Upstream(ChatError::status(503, "down")).into();
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(e.code(), "upstream-unavailable");

        let e: ApiError = AnalysisError::Internal("boom".into()).into();
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.code(), "internal");
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let e = ApiError::RateLimited;
        assert_eq!(e.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(e.code(), "rate-limited");
    }

    #[test]
    fn test_upstream_detail_keeps_original_message() {
        let e: ApiError = AnalysisError::Upstream(ChatError::status(503, "down")).into();
        assert!(e.to_string().contains("503"));
    }
}
