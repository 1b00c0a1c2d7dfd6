use crate::domain::error::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => e.kind(),
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::RouteNotFound => "not_found",
        }
    }

    /// Message safe to show a client. Server-side failures stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::Embedding(_)) => {
                "Failed to compute embedding for the query".to_string()
            }
            ApiError::Domain(e) if self.status_code().is_server_error() => {
                tracing::debug!(error = %e, "hiding internal error detail");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }
        let body = Json(json!({
            "error": self.public_message(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Decode("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Fetch("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Extraction("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Embedding("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::from(DomainError::Internal("db password is hunter2".into()));
        assert!(!err.public_message().contains("hunter2"));

        let err = ApiError::from(DomainError::Embedding("upstream 502 at 10.0.0.4".into()));
        assert!(!err.public_message().contains("10.0.0.4"));
    }

    #[test]
    fn test_client_errors_keep_detail() {
        let err = ApiError::from(DomainError::Fetch("https://x/y returned 404".into()));
        assert!(err.public_message().contains("returned 404"));
        assert_eq!(err.kind(), "fetch");
    }
}
