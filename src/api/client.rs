//! HTTP client for the Pextra CloudEnvironment REST API.
//!
//! [`ApiClient`] is the reusable, immutable part: base URL, TLS trust,
//! timeout and default headers. [`SessionClient`] is a cheap per-request
//! view over a shared [`ApiClient`] that carries the caller's credential,
//! so concurrent requests never observe each other's `Authorization`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Certificate, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::{ApiError, ApiResult};

/// Fixed path prefix of every backend endpoint.
pub const API_PREFIX: &str = "/api";

const JSON: &str = "application/json";

/// Settings used to construct an [`ApiClient`].
#[derive(Clone)]
pub struct ClientSettings {
    /// Backend base URL, e.g. `https://10.0.0.5:5007`.
    pub base_url: String,

    /// Skip TLS certificate verification. Mutually exclusive with `ca_cert_path`.
    pub tls_skip_verify: bool,

    /// PEM bundle of additional trusted CA certificates.
    pub ca_cert_path: Option<PathBuf>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Extra headers applied to every request.
    pub headers: Vec<(String, String)>,
}

impl ClientSettings {
    /// Settings with the given base URL and defaults for everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tls_skip_verify: false,
            ca_cert_path: None,
            timeout: Duration::from_secs(10),
            headers: Vec::new(),
        }
    }
}

/// Header values may carry secrets, so only names are printed.
impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("ca_cert_path", &self.ca_cert_path)
            .field("timeout", &self.timeout)
            .field("headers", &header_names)
            .finish()
    }
}

/// Reusable backend client configuration.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_prefix: String,
    headers: HeaderMap,
}

impl ApiClient {
    /// Validate `settings` and assemble a client. No network call is made.
    pub fn new(settings: &ClientSettings) -> ApiResult<Self> {
        if settings.tls_skip_verify && settings.ca_cert_path.is_some() {
            return Err(ApiError::configuration(
                "invalid TLS configuration: skipping verification and a custom CA certificate are mutually exclusive",
            ));
        }

        let base_url = Url::parse(settings.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::configuration(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::configuration(format!(
                "invalid base URL: {} cannot be used as a base",
                settings.base_url
            )));
        }

        let mut builder = reqwest::Client::builder().timeout(settings.timeout);

        if settings.tls_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = &settings.ca_cert_path {
            for cert in load_ca_bundle(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &settings.headers {
            let name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| ApiError::configuration(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|e| ApiError::configuration(format!("invalid value for header '{name}': {e}")))?;
            headers.append(name, value);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_prefix: API_PREFIX.to_string(),
            headers,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request (before the credential is applied).
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replace `{name}` placeholders with percent-escaped values.
    ///
    /// Placeholders without a matching parameter are left as-is.
    pub fn expand_path(template: &str, params: &[(&str, &str)]) -> String {
        params.iter().fold(template.to_string(), |path, (name, value)| {
            path.replace(&format!("{{{name}}}"), &urlencoding::encode(value))
        })
    }

    /// Full request URL: base + API prefix + path + optional query string.
    pub fn build_url(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<String> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.api_prefix.trim_end_matches('/');
        let mut full = format!("{base}{prefix}/{}", path.trim_start_matches('/'));

        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| ApiError::invalid_argument(format!("invalid query parameters: {e}")))?;
            full.push('?');
            full.push_str(&encoded);
        }

        Ok(full)
    }
}

fn load_ca_bundle(path: &PathBuf) -> ApiResult<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        ApiError::configuration(format!("failed to read CA cert file {}: {e}", path.display()))
    })?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        ApiError::configuration(format!("invalid CA certificate {}: {e}", path.display()))
    })?;
    if certs.is_empty() {
        return Err(ApiError::configuration(format!(
            "invalid CA certificate {}: no certificates found",
            path.display()
        )));
    }
    Ok(certs)
}

/// Per-request view of a shared [`ApiClient`] carrying the caller's credential.
#[derive(Debug, Clone)]
pub struct SessionClient {
    client: Arc<ApiClient>,
    authorization: Option<HeaderValue>,
}

impl SessionClient {
    /// Pair a shared client with a credential (`None` sends no `Authorization`).
    pub fn new(client: Arc<ApiClient>, authorization: Option<HeaderValue>) -> Self {
        Self {
            client,
            authorization,
        }
    }

    /// The shared client handle.
    pub fn handle(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The credential this view sends, if any.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    /// Headers for one outgoing request.
    pub fn request_headers(&self, with_body: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        for (name, value) in &self.client.headers {
            headers.append(name.clone(), value.clone());
        }

        headers.remove(AUTHORIZATION);
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }

        if with_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }
        headers
    }

    /// GET `path` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        self.send(Method::GET, path, query, None).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.send(Method::POST, path, query, Some(body)).await
    }

    /// PUT a JSON body to `path` and decode the JSON response.
    pub async fn put<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.send(Method::PUT, path, query, Some(body)).await
    }

    /// DELETE `path` and decode the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        self.send(Method::DELETE, path, query, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        let url = self.client.build_url(path, query)?;
        debug!(%method, %url, "Sending backend request");

        let mut request = self
            .client
            .http
            .request(method, &url)
            .headers(self.request_headers(body.is_some()));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(format!("reading response failed: {e}")))?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &bytes);
            debug!(%url, status = status.as_u16(), "Backend returned an error: {}", err);
            return Err(err);
        }

        decode_body(&bytes)
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|e| ApiError::invalid_argument(format!("failed to encode request payload: {e}")))
}

/// Empty 2xx bodies decode as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    decoded.map_err(|e| ApiError::transport(format!("decoding response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn client() -> ApiClient {
        ApiClient::new(&ClientSettings::new("https://10.0.0.5:5007/")).unwrap()
    }

    #[test]
    fn test_expand_path_escapes_values() {
        let path = ApiClient::expand_path("/v1/nodes/{node_id}", &[("node_id", "node-1 2")]);
        assert_eq!(path, "/v1/nodes/node-1%202");
    }

    #[test]
    fn test_expand_path_escapes_slashes() {
        let path = ApiClient::expand_path("/v1/users/{user_id}", &[("user_id", "a/b")]);
        assert_eq!(path, "/v1/users/a%2Fb");
    }

    #[test]
    fn test_expand_path_keeps_unresolved_placeholders() {
        let path = ApiClient::expand_path(
            "/v1/instances/{instance_id}/power",
            &[("node_id", "node-1")],
        );
        assert_eq!(path, "/v1/instances/{instance_id}/power");
    }

    #[test]
    fn test_build_url() {
        let url = client().build_url("/v1/nodes/node-1", &[]).unwrap();
        assert_eq!(url, "https://10.0.0.5:5007/api/v1/nodes/node-1");
    }

    #[test]
    fn test_build_url_with_query() {
        let url = client()
            .build_url("v1/instances", &[("node_id", "node 1")])
            .unwrap();
        assert_eq!(url, "https://10.0.0.5:5007/api/v1/instances?node_id=node+1");
    }

    #[test]
    fn test_rejects_conflicting_tls_options() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.tls_skip_verify = true;
        settings.ca_cert_path = Some(PathBuf::from("/etc/ssl/ca.pem"));

        let err = ApiClient::new(&settings).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert!(err.to_string().contains("invalid TLS configuration"));
    }

    #[test]
    fn test_rejects_missing_ca_file() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.ca_cert_path = Some(PathBuf::from("/nonexistent/ca.pem"));

        let err = ApiClient::new(&settings).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_rejects_unparsable_ca_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not a certificate").unwrap();

        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.ca_cert_path = Some(file.path().to_path_buf());

        let err = ApiClient::new(&settings).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_rejects_invalid_header() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.headers.push(("bad header".into(), "x".into()));
        assert!(matches!(
            ApiClient::new(&settings),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn test_request_headers_apply_credential() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.headers.push(("X-Tenant".into(), "blue".into()));
        let shared = Arc::new(ApiClient::new(&settings).unwrap());

        let view = SessionClient::new(shared.clone(), Some(HeaderValue::from_static("Bearer abc")));
        let headers = view.request_headers(true);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.get(ACCEPT).unwrap(), JSON);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), JSON);
        assert_eq!(headers.get("x-tenant").unwrap(), "blue");

        let anonymous = SessionClient::new(shared, None);
        let headers = anonymous.request_headers(false);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_empty_credential_strips_default_authorization() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.headers.push(("Authorization".into(), "Bearer static".into()));
        let shared = Arc::new(ApiClient::new(&settings).unwrap());

        let headers = SessionClient::new(shared, None).request_headers(false);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_settings_debug_hides_header_values() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.headers.push(("X-Api-Key".into(), "s3cret".into()));
        let debug = format!("{:?}", settings);
        assert!(debug.contains("X-Api-Key"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<serde_json::Value> = decode_body(b"").unwrap();
        assert!(value.is_none());
    }
}
