//! Startup configuration from the command line.

use std::time::Duration;

use clap::Parser;
use pce_mcp_server::core::config::{Cli, Command, ConfigError};
use pce_mcp_server::core::AppConfig;

fn load(args: &[&str]) -> Result<AppConfig, ConfigError> {
    let mut argv = vec!["pce-mcp", "serve"];
    argv.extend_from_slice(args);
    let Command::Serve(serve) = Cli::try_parse_from(argv).unwrap().command;
    serve.into_config()
}

#[test]
fn reference_backend_is_accepted() {
    let config = load(&["--base-url", "https://10.0.0.5:5007", "--timeout", "10"]).unwrap();

    assert_eq!(config.client.base_url, "https://10.0.0.5:5007");
    assert_eq!(config.client.timeout, Duration::from_secs(10));
    assert!(config.transport.any_enabled());
}

#[test]
fn conflicting_tls_options_are_rejected() {
    let err = load(&[
        "--base-url",
        "https://10.0.0.5:5007",
        "--timeout",
        "10",
        "--tls-skip-verify",
        "--tls-ca-cert",
        "/etc/ssl/pce-ca.pem",
    ])
    .unwrap_err();

    assert!(err.mentions("invalid TLS configuration"));
}

#[test]
fn listeners_can_be_disabled_individually() {
    let config = load(&[
        "--base-url",
        "https://10.0.0.5:5007",
        "--sse-addr",
        "",
        "--http-addr",
        "127.0.0.1:9000",
        "--disable-stdio",
    ])
    .unwrap();

    assert!(!config.transport.stdio);
    assert!(config.transport.sse_addr.is_none());
    assert_eq!(config.transport.http_addr.as_deref(), Some("127.0.0.1:9000"));
}

#[test]
fn bad_listen_address_is_reported() {
    let err = load(&["--base-url", "https://10.0.0.5:5007", "--http-addr", ":http"]).unwrap_err();
    assert!(err.mentions("invalid port"));
}

#[test]
fn help_is_not_an_error() {
    let err = Cli::try_parse_from(["pce-mcp", "--help"]).unwrap_err();
    assert!(!err.use_stderr());
}

#[tokio::test]
async fn serve_rejects_unusable_client_settings_before_listening() {
    let mut config = AppConfig::new("https://10.0.0.5:5007");
    config.client.tls_skip_verify = true;
    config.client.ca_cert_path = Some("/etc/ssl/pce-ca.pem".into());

    let err = pce_mcp_server::serve(config).await.unwrap_err();

    match err {
        pce_mcp_server::Error::Config(issues) => {
            assert!(issues.mentions("invalid TLS configuration"));
        }
        other => panic!("expected a configuration error, got {other}"),
    }
}

#[test]
fn cors_is_on_unless_disabled() {
    let config = load(&["--base-url", "https://10.0.0.5:5007"]).unwrap();
    assert!(config.transport.enable_cors);

    let config = load(&["--base-url", "https://10.0.0.5:5007", "--disable-cors"]).unwrap();
    assert!(!config.transport.enable_cors);
}

#[test]
fn headers_flag_spelling_is_accepted() {
    let config = load(&[
        "--base-url",
        "https://10.0.0.5:5007",
        "--headers",
        "X-Tenant=blue",
        "--header",
        "X-Zone=eu",
    ])
    .unwrap();

    assert_eq!(
        config.client.headers,
        vec![
            ("X-Tenant".to_string(), "blue".to_string()),
            ("X-Zone".to_string(), "eu".to_string()),
        ]
    );
}
