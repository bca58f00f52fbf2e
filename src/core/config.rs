//! Configuration management for the MCP server.
//!
//! Flags are parsed with clap, each with an environment variable fallback
//! (a `.env` file is loaded first by `main`). [`ServeArgs::into_config`]
//! validates everything at once and produces an immutable [`AppConfig`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use super::transport::config::{DEFAULT_HTTP_ADDR, DEFAULT_SSE_ADDR, normalize_addr, validate_addr};
use super::transport::TransportConfig;
use crate::api::{ApiClient, ClientSettings};

pub const DEFAULT_TIMEOUT_SECS: i64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// MCP server for Pextra CloudEnvironment.
#[derive(Debug, Parser)]
#[command(name = "pce-mcp", version, about, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the MCP server on all enabled transports
    Serve(ServeArgs),
}

/// Flags of the `serve` command.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Listen address of the SSE transport (empty to disable)
    #[arg(long = "sse-addr", env = "SSE_ADDR", default_value = DEFAULT_SSE_ADDR)]
    pub sse_addr: String,

    /// Listen address of the streamable HTTP transport (empty to disable)
    #[arg(long = "http-addr", env = "HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// Do not serve MCP over stdin/stdout
    #[arg(long = "disable-stdio", env = "DISABLE_STDIO", default_value_t = false)]
    pub disable_stdio: bool,

    /// Do not add CORS headers to SSE and streamable HTTP responses
    #[arg(long = "disable-cors", env = "DISABLE_CORS", default_value_t = false)]
    pub disable_cors: bool,

    /// Base URL of the PCE API, e.g. https://10.0.0.5:5007
    #[arg(long = "base-url", env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Skip TLS certificate verification (insecure)
    #[arg(long = "tls-skip-verify", env = "TLS_SKIP_VERIFY", default_value_t = false)]
    pub tls_skip_verify: bool,

    /// Additional trusted CA certificates (PEM)
    #[arg(long = "tls-ca-cert", value_name = "PATH", env = "TLS_CA_CERT")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Backend request timeout in seconds
    #[arg(
        long,
        env = "TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        allow_negative_numbers = true
    )]
    pub timeout: i64,

    /// Extra header sent with every backend request (repeatable)
    #[arg(
        long = "header",
        alias = "headers",
        value_name = "KEY=VALUE",
        env = "HEADERS",
        value_delimiter = ','
    )]
    pub headers: Vec<String>,

    /// Authorization value used for stdio tool calls
    #[arg(
        long = "stdio-authorization",
        env = "STDIO_AUTHORIZATION",
        hide_env_values = true
    )]
    pub stdio_authorization: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

/// Every problem found while validating the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid configuration: {}", .issues.join("; "))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

impl ConfigError {
    pub fn new(issue: impl Into<String>) -> Self {
        Self {
            issues: vec![issue.into()],
        }
    }

    /// True when any issue mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.issues.iter().any(|issue| issue.contains(needle))
    }
}

/// Validated, immutable server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Settings every backend client handle is built from.
    pub client: ClientSettings,

    /// Credentials configured at startup.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Credentials configured at startup.
#[derive(Clone, Default)]
pub struct CredentialsConfig {
    /// `Authorization` value for tool calls arriving over stdio.
    pub stdio_authorization: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "stdio_authorization",
                &self.stdio_authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Config for the given backend with every other option at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
            transport: TransportConfig::default(),
            client: ClientSettings::new(base_url),
            credentials: CredentialsConfig::default(),
        }
    }

    /// Credential used for stdio invocations, empty when unset.
    pub fn stdio_credential(&self) -> &str {
        self.credentials
            .stdio_authorization
            .as_deref()
            .unwrap_or_default()
    }
}

impl ServeArgs {
    /// Validate the flags and build the server configuration.
    ///
    /// All issues are collected before failing. When the flags are valid a
    /// template backend client is built once, so unreadable CA material is
    /// reported before any listener starts.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut issues = Vec::new();

        let sse_addr = normalize_addr(&self.sse_addr);
        let http_addr = normalize_addr(&self.http_addr);
        for addr in sse_addr.iter().chain(http_addr.iter()) {
            if let Err(issue) = validate_addr(addr) {
                issues.push(issue);
            }
        }

        let transport = TransportConfig {
            stdio: !self.disable_stdio,
            sse_addr,
            http_addr,
            enable_cors: !self.disable_cors,
        };
        if !transport.any_enabled() {
            issues.push(
                "no transport enabled: set an SSE or HTTP address, or enable stdio".to_string(),
            );
        }

        let base_url = self.base_url.as_deref().map(str::trim).unwrap_or_default();
        if base_url.is_empty() {
            issues.push("base URL is required".to_string());
        } else if let Err(issue) = validate_base_url(base_url) {
            issues.push(issue);
        }

        if self.timeout <= 0 {
            issues.push(format!(
                "timeout must be greater than 0 seconds, got {}",
                self.timeout
            ));
        }

        if self.tls_skip_verify && self.tls_ca_cert.is_some() {
            issues.push(
                "invalid TLS configuration: --tls-skip-verify and --tls-ca-cert are mutually exclusive"
                    .to_string(),
            );
        }

        let mut headers = Vec::new();
        for pair in self.headers.iter().filter(|pair| !pair.trim().is_empty()) {
            match parse_header(pair) {
                Ok(header) => headers.push(header),
                Err(issue) => issues.push(issue),
            }
        }

        if !issues.is_empty() {
            return Err(ConfigError { issues });
        }

        let client = ClientSettings {
            base_url: base_url.to_string(),
            tls_skip_verify: self.tls_skip_verify,
            ca_cert_path: self.tls_ca_cert,
            timeout: Duration::from_secs(self.timeout.unsigned_abs()),
            headers,
        };
        ApiClient::new(&client).map_err(|e| ConfigError::new(e.to_string()))?;

        Ok(AppConfig {
            server: ServerConfig::default(),
            logging: LoggingConfig {
                level: self.log_level,
            },
            transport,
            client,
            credentials: CredentialsConfig {
                stdio_authorization: self
                    .stdio_authorization
                    .filter(|value| !value.trim().is_empty()),
            },
        })
    }
}

fn validate_base_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| format!("invalid base URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        "http" | "https" => Err(format!("invalid base URL '{raw}': missing host")),
        scheme => Err(format!(
            "invalid base URL '{raw}': unsupported scheme '{scheme}'"
        )),
    }
}

fn parse_header(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid header '{pair}': expected KEY=VALUE")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn serve_args(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["pce-mcp", "serve"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Serve(args) => args,
        }
    }

    #[test]
    fn test_valid_config() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let config = serve_args(&["--base-url", "https://10.0.0.5:5007", "--timeout", "10"])
            .into_config()
            .unwrap();

        assert_eq!(config.client.base_url, "https://10.0.0.5:5007");
        assert_eq!(config.client.timeout, Duration::from_secs(10));
        assert!(!config.client.tls_skip_verify);
        assert!(config.client.ca_cert_path.is_none());
        assert_eq!(config.transport.sse_addr.as_deref(), Some("0.0.0.0:2222"));
        assert_eq!(config.stdio_credential(), "");
    }

    #[test]
    fn test_conflicting_tls_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let err = serve_args(&[
            "--base-url",
            "https://10.0.0.5:5007",
            "--tls-skip-verify",
            "--tls-ca-cert",
            "/etc/ssl/ca.pem",
        ])
        .into_config()
        .unwrap_err();

        assert!(err.mentions("invalid TLS configuration"));
        assert!(err.to_string().contains("invalid TLS configuration"));
    }

    #[test]
    fn test_issues_are_collected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let err = serve_args(&[
            "--sse-addr",
            "",
            "--http-addr",
            "",
            "--disable-stdio",
            "--timeout",
            "0",
        ])
        .into_config()
        .unwrap_err();

        assert_eq!(err.issues.len(), 3);
        assert!(err.mentions("no transport enabled"));
        assert!(err.mentions("base URL is required"));
        assert!(err.mentions("timeout must be greater than 0"));
        assert_eq!(err.to_string().matches("; ").count(), 2);
    }

    #[test]
    fn test_negative_timeout_and_bad_url() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let err = serve_args(&["--base-url", "10.0.0.5:5007", "--timeout", "-3"])
            .into_config()
            .unwrap_err();
        assert!(err.mentions("invalid base URL"));
        assert!(err.mentions("got -3"));
    }

    #[test]
    fn test_headers_parsed() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let config = serve_args(&[
            "--base-url",
            "https://pce.local",
            "--header",
            "X-Tenant=blue",
            "--header",
            "X-Trace = on ",
        ])
        .into_config()
        .unwrap();
        assert_eq!(
            config.client.headers,
            vec![
                ("X-Tenant".to_string(), "blue".to_string()),
                ("X-Trace".to_string(), "on".to_string()),
            ]
        );

        let err = serve_args(&["--base-url", "https://pce.local", "--header", "broken"])
            .into_config()
            .unwrap_err();
        assert!(err.mentions("expected KEY=VALUE"));
    }

    #[test]
    fn test_missing_ca_file_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let err = serve_args(&[
            "--base-url",
            "https://pce.local",
            "--tls-ca-cert",
            "/nonexistent/ca.pem",
        ])
        .into_config()
        .unwrap_err();
        assert!(err.mentions("CA cert"));
    }

    #[test]
    fn test_env_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("BASE_URL", "https://from-env.local");
            std::env::set_var("STDIO_AUTHORIZATION", "Bearer env-token");
        }
        let config = serve_args(&[]).into_config();
        unsafe {
            std::env::remove_var("BASE_URL");
            std::env::remove_var("STDIO_AUTHORIZATION");
        }

        let config = config.unwrap();
        assert_eq!(config.client.base_url, "https://from-env.local");
        assert_eq!(config.stdio_credential(), "Bearer env-token");
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            stdio_authorization: Some("Bearer super_secret".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
    }
}
