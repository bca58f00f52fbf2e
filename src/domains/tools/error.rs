//! Tool-specific error types.

use rmcp::model::{CallToolResult, Content};
use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during tool operations.
///
/// None of these are fatal: each becomes an error result for the one
/// invocation that hit it.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A parameter is missing, empty or of the wrong type.
    #[error("{0}")]
    InvalidArgument(String),

    /// The backend client could not be built for this session.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Backend { status: u16, message: String },

    /// The backend could not be reached or answered with garbage.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid argument" error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Convert into the error result returned to the client.
    pub fn into_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(self.to_string())])
    }
}

impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            ApiError::Configuration(msg) => Self::Configuration(msg),
            ApiError::Backend { status, message } => Self::Backend { status, message },
            ApiError::Transport(msg) => Self::Transport(msg),
        }
    }
}
