use serde::Deserialize;
use thiserror::Error;

/// Normalized error returned by every `ApiClient` operation.
///
/// Callers see one of these regardless of how the request failed. Use
/// [`ApiError::code`] and [`ApiError::message`] for presentation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, broken transport).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 401/403 from the server, or no usable token for an authenticated call.
    #[error("Not authorized: {0}")]
    AuthError(String),

    /// Rejected input, either by a local validator or by a 4xx from the server.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFoundError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    /// A success status whose body could not be decoded, or a status outside
    /// the mapped ranges.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape produced by the server (Spring's default error attributes).
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Stable, upper-snake identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NetworkError(_) => "NETWORK_ERROR",
            ApiError::AuthError(_) => "AUTH_ERROR",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::NotFoundError(_) => "NOT_FOUND",
            ApiError::ServerError(_) => "SERVER_ERROR",
            ApiError::InvalidResponse(_) => "INVALID_RESPONSE",
            ApiError::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable message, without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            ApiError::NetworkError(msg)
            | ApiError::AuthError(msg)
            | ApiError::ValidationError(msg)
            | ApiError::NotFoundError(msg)
            | ApiError::ServerError(msg)
            | ApiError::InvalidResponse(msg) => msg.clone(),
            ApiError::Cancelled => "request cancelled before dispatch".to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthError(_))
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let cut = (0..=MAX_ERROR_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
    }

    /// Pull the server-provided message out of an error body, falling back to
    /// the raw text and then to the status reason.
    fn extract_message(status: reqwest::StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ServerErrorBody>(body) {
            if let Some(msg) = parsed.message.filter(|m| !m.trim().is_empty()) {
                return Self::truncate_body(&msg);
            }
        }
        let trimmed = body.trim();
        if !trimmed.is_empty() {
            return Self::truncate_body(trimmed);
        }
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {}", status.as_u16()))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(status, body);
        match status.as_u16() {
            401 | 403 => ApiError::AuthError(message),
            404 => ApiError::NotFoundError(message),
            400..=499 => ApiError::ValidationError(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::AuthError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::FORBIDDEN, ""), ApiError::AuthError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, ""), ApiError::NotFoundError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_REQUEST, ""), ApiError::ValidationError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::CONFLICT, ""), ApiError::ValidationError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, ""), ApiError::ServerError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, ""), ApiError::ServerError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::MOVED_PERMANENTLY, ""), ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_from_status_uses_server_message() {
        let body = r#"{"path":"/api/customers","message":"email is already taken","statusCode":409}"#;
        let err = ApiError::from_status(StatusCode::CONFLICT, body);
        assert_eq!(err, ApiError::ValidationError("email is already taken".to_string()));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "email is already taken");
    }

    #[test]
    fn test_from_status_falls_back_to_body_then_reason() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "no such thing");
        assert_eq!(err.message(), "no such thing");

        let err = ApiError::from_status(StatusCode::NOT_FOUND, "");
        assert_eq!(err.message(), "Not Found");

        // JSON without a message field falls back to the raw body
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"bad"}"#);
        assert_eq!(err.message(), r#"{"error":"bad"}"#);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("510 total bytes"));

        // Never splits a multi-byte character
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&wide);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::NetworkError(String::new()).code(), "NETWORK_ERROR");
        assert_eq!(ApiError::AuthError(String::new()).code(), "AUTH_ERROR");
        assert_eq!(ApiError::NotFoundError(String::new()).code(), "NOT_FOUND");
        assert_eq!(ApiError::ServerError(String::new()).code(), "SERVER_ERROR");
        assert_eq!(ApiError::Cancelled.code(), "CANCELLED");
        assert!(ApiError::AuthError(String::new()).is_auth());
        assert!(!ApiError::Cancelled.is_auth());
    }
}
