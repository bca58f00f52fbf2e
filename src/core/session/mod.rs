//! Per-session client handles and caller identity.

mod context;
mod registry;

pub use context::{
    CallerContext, CallerSource, DEFAULT_SESSION_ID, SESSION_ID_HEADER, STDIO_SESSION_ID,
};
pub use registry::{ClientFactory, SessionRegistry, SettingsClientFactory};
