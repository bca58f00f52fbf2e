//! Error types and handling for the MCP server.
//!
//! This module defines the top-level error returned by server startup and
//! the transport lifecycle. Tool failures never reach it: they are turned
//! into error results at the tool boundary.

use thiserror::Error;

use super::config::ConfigError;
use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or conflicting startup configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
