//! Client for the Pextra CloudEnvironment REST API.
//!
//! [`client`] holds the transport; the remaining modules are thin typed
//! wrappers, one function per endpoint.

pub mod client;
pub mod clusters;
pub mod error;
pub mod healthcheck;
pub mod images;
pub mod instances;
pub mod models;
pub mod nodes;
pub mod organizations;
pub mod users;

pub use client::{API_PREFIX, ApiClient, ClientSettings, SessionClient};
pub use error::{ApiError, ApiResult};
