//! Who is calling: session id and credential of one tool invocation.

use std::fmt;

use http::header::AUTHORIZATION;
use http::request::Parts;
use rmcp::model::Extensions;

/// Session id used for every stdio invocation.
pub const STDIO_SESSION_ID: &str = "stdio";

/// Session id for streamable HTTP requests that carry no session header.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Header carrying the streamable HTTP session id.
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Session id and credential of one tool invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub session_id: String,
    /// Raw `Authorization` value; empty when the caller sent none.
    pub credential: String,
}

impl fmt::Debug for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerContext")
            .field("session_id", &self.session_id)
            .field(
                "credential",
                &(!self.credential.is_empty()).then_some("[REDACTED]"),
            )
            .finish()
    }
}

impl CallerContext {
    pub fn new(session_id: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            credential: credential.into(),
        }
    }

    pub fn stdio(credential: &str) -> Self {
        Self::new(STDIO_SESSION_ID, credential)
    }

    /// Read the session id and credential from HTTP request headers.
    pub fn from_parts(parts: &Parts) -> Self {
        let header = |name| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .unwrap_or_default()
        };

        let session_id = match header(SESSION_ID_HEADER) {
            "" => DEFAULT_SESSION_ID,
            id => id,
        };
        Self::new(session_id, header(AUTHORIZATION.as_str()))
    }
}

/// Where a server instance receives its requests from.
#[derive(Clone, PartialEq, Eq)]
pub enum CallerSource {
    /// Single-client stdio stream with a credential fixed at startup.
    Stdio { credential: String },
    /// HTTP requests; identity comes from each request's headers.
    Http,
}

impl fmt::Debug for CallerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio { .. } => f.write_str("Stdio"),
            Self::Http => f.write_str("Http"),
        }
    }
}

impl CallerSource {
    /// Caller of a request, given the request's protocol extensions.
    pub fn caller(&self, extensions: &Extensions) -> CallerContext {
        match self {
            Self::Stdio { credential } => CallerContext::stdio(credential),
            Self::Http => extensions
                .get::<Parts>()
                .map(CallerContext::from_parts)
                .unwrap_or_else(|| CallerContext::new(DEFAULT_SESSION_ID, "")),
        }
    }
}
