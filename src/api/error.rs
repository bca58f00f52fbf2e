//! Error types for the backend API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type for backend API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors produced while building a client or talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A caller-supplied value (session id, credential, endpoint argument) is missing or malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The client configuration is invalid or self-contradictory.
    #[error("{0}")]
    Configuration(String),

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Backend { status: u16, message: String },

    /// Network-level failure, timeout, or an undecodable response body.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a backend error.
    pub fn backend(status: u16, msg: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: msg.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// HTTP status carried by a backend error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Shortcut for the "`<field>` is required" argument error.
    pub(crate) fn required(field: &str) -> Self {
        Self::InvalidArgument(format!("{field} is required"))
    }

    /// Decode a non-2xx response into a backend error.
    ///
    /// Prefers a structured `{code, message}` body, then the raw body text,
    /// then the canonical reason phrase of the status.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
            if parsed.code != 0 || !parsed.message.is_empty() {
                let code = if parsed.code == 0 {
                    status.as_u16()
                } else {
                    parsed.code
                };
                let message = if parsed.message.is_empty() {
                    status_text(status)
                } else {
                    parsed.message
                };
                return Self::backend(code, message);
            }
        }

        let raw = String::from_utf8_lossy(body);
        let raw = raw.trim();
        let message = if raw.is_empty() {
            status_text(status)
        } else {
            raw.to_string()
        };
        Self::backend(status.as_u16(), message)
    }
}

/// Structured error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_body() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            br#"{"code":404,"message":"not found"}"#,
        );
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, ApiError::Backend { ref message, .. } if message == "not found"));
    }

    #[test]
    fn test_structured_body_without_code_uses_http_status() {
        let err = ApiError::from_response(StatusCode::CONFLICT, br#"{"message":"name taken"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "name taken (HTTP 409)");
    }

    #[test]
    fn test_raw_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"  upstream down \n");
        assert!(matches!(err, ApiError::Backend { status: 502, ref message } if message == "upstream down"));
    }

    #[test]
    fn test_unrelated_json_falls_back_to_raw() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, br#"{"error":"bad"}"#);
        assert!(matches!(err, ApiError::Backend { ref message, .. } if message == r#"{"error":"bad"}"#));
    }

    #[test]
    fn test_empty_body_uses_status_text() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert!(matches!(
            err,
            ApiError::Backend { status: 500, ref message } if message == "Internal Server Error"
        ));
    }
}
