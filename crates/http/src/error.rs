//! Error handling for the Bookstall HTTP layer

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Vec<serde_json::Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Envelope placed around [`ErrorBody`] on the wire.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("conflict: {message}")]
    Conflict {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String, code: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            code: "conflict".to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create an unauthorized error. Rendered with `WWW-Authenticate: Bearer`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            code: "unauthorized".to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            code: "forbidden".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// HTTP status this error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let (error_code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            }
            | AppError::Conflict {
                details,
                code,
                message,
            } => (code, message, details),
            AppError::NotFound { message, code }
            | AppError::Unauthorized { message, code }
            | AppError::Forbidden { message, code }
            | AppError::BadRequest { message, code } => (code, message, Vec::new()),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "Request error");
                ("internal_error".to_string(), e.to_string(), Vec::new())
            }
        };

        if status.is_client_error() {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        // Hide internal error details outside of debug builds
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: error_code,
                message,
                details,
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let details = vec![serde_json::json!({"field": "year", "error": "range"})];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation {
                details: d,
                code,
                message,
            } => {
                assert_eq!(d, details);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "Validation failed");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_error_response_mapping() {
        assert_eq!(
            AppError::not_found("missing").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict(vec![], "taken").into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::forbidden("nope").into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::validation(vec![], "bad").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = AppError::unauthorized("Could not validate credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let details = vec![serde_json::json!({"field": "email", "error": "taken"})];
        let response = AppError::conflict(details, "Seller already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        let error = &body["error"];
        assert_eq!(error["code"], "conflict");
        assert_eq!(error["message"], "Seller already exists");
        assert_eq!(error["details"][0]["field"], "email");
        assert!(Uuid::parse_str(error["trace_id"].as_str().unwrap()).is_ok());
        assert!(OffsetDateTime::parse(error["timestamp"].as_str().unwrap(), &Rfc3339).is_ok());
    }
}
