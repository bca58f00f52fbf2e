//! Domains module containing the business logic exposed over MCP.
//!
//! The server only exposes tools; each one maps to a PCE API operation.

pub mod tools;
