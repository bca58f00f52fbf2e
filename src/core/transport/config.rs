//! Transport configuration types.

/// Default listen address of the SSE transport.
pub const DEFAULT_SSE_ADDR: &str = ":2222";

/// Default listen address of the streamable HTTP transport.
pub const DEFAULT_HTTP_ADDR: &str = ":2223";

/// Which transports run, and where the network ones listen.
///
/// Any combination may be enabled; they all share one session registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Serve MCP over stdin/stdout.
    pub stdio: bool,

    /// Listen address of the SSE transport, `None` when disabled.
    pub sse_addr: Option<String>,

    /// Listen address of the streamable HTTP transport, `None` when disabled.
    pub http_addr: Option<String>,

    /// Add permissive CORS headers to HTTP responses.
    pub enable_cors: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            stdio: true,
            sse_addr: normalize_addr(DEFAULT_SSE_ADDR),
            http_addr: normalize_addr(DEFAULT_HTTP_ADDR),
            enable_cors: true,
        }
    }
}

impl TransportConfig {

    /// True when at least one transport is enabled.
    pub fn any_enabled(&self) -> bool {
        self.stdio || self.sse_addr.is_some() || self.http_addr.is_some()
    }

    /// Get a description of the enabled transports for logging.
    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.stdio {
            parts.push("STDIO".to_string());
        }
        if let Some(addr) = &self.sse_addr {
            parts.push(format!("SSE on http://{addr}/sse"));
        }
        if let Some(addr) = &self.http_addr {
            parts.push(format!("Streamable HTTP on http://{addr}/mcp"));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Turn a listen address flag into a bindable address.
///
/// Empty disables the listener; `:port` binds all interfaces.
pub fn normalize_addr(addr: &str) -> Option<String> {
    let addr = addr.trim();
    if addr.is_empty() {
        None
    } else if addr.starts_with(':') {
        Some(format!("0.0.0.0{addr}"))
    } else {
        Some(addr.to_string())
    }
}

/// Check that `addr` ends in a valid port.
pub fn validate_addr(addr: &str) -> Result<(), String> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| format!("listen address '{addr}' is missing a port"))?;
    if host.is_empty() {
        return Err(format!("listen address '{addr}' is missing a host"));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("listen address '{addr}' has an invalid port"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_addr() {
        assert_eq!(normalize_addr(":2222").as_deref(), Some("0.0.0.0:2222"));
        assert_eq!(normalize_addr("127.0.0.1:80").as_deref(), Some("127.0.0.1:80"));
        assert_eq!(normalize_addr("  "), None);
    }

    #[test]
    fn test_validate_addr() {
        assert!(validate_addr("0.0.0.0:2222").is_ok());
        assert!(validate_addr("[::1]:8080").is_ok());
        assert!(validate_addr("localhost").is_err());
        assert!(validate_addr("0.0.0.0:http").is_err());
    }

    #[test]
    fn test_default_enables_everything() {
        let config = TransportConfig::default();
        assert!(config.stdio);
        assert_eq!(config.sse_addr.as_deref(), Some("0.0.0.0:2222"));
        assert_eq!(config.http_addr.as_deref(), Some("0.0.0.0:2223"));
        assert!(config.description().contains("SSE"));
    }

    #[test]
    fn test_any_enabled() {
        let mut config = TransportConfig {
            stdio: true,
            sse_addr: None,
            http_addr: None,
            enable_cors: false,
        };
        assert!(config.any_enabled());
        config.stdio = false;
        assert!(!config.any_enabled());
        assert_eq!(config.description(), "none");
    }
}
