//! Session registry.
//!
//! Maps an opaque session id to a long-lived [`ApiClient`] handle. The map
//! itself sits behind one registry-wide `RwLock`; each entry carries its own
//! small lock for the last credential seen on that session, so recording a
//! credential never blocks other sessions.
//!
//! Handles are immutable. [`SessionRegistry::resolve`] hands out a
//! [`SessionClient`] view that carries the caller's credential, so two
//! requests on the same session with different credentials each send their
//! own.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use reqwest::header::HeaderValue;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError, ClientSettings, SessionClient};

/// Builds the client handle for a new session.
pub trait ClientFactory: Send + Sync {
    fn build(&self) -> Result<ApiClient, ApiError>;
}

/// Factory building every handle from the same immutable settings.
#[derive(Debug, Clone)]
pub struct SettingsClientFactory {
    settings: ClientSettings,
}

impl SettingsClientFactory {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

impl ClientFactory for SettingsClientFactory {
    fn build(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(&self.settings)
    }
}

/// One live session.
struct SessionEntry {
    client: Arc<ApiClient>,
    credential: Mutex<Option<HeaderValue>>,
}

impl SessionEntry {
    fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
            credential: Mutex::new(None),
        }
    }
}

/// Registry of live sessions and their client handles.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
    factory: Arc<dyn ClientFactory>,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.len())
            .finish()
    }
}

impl SessionRegistry {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            factory,
        }
    }

    /// Registry whose handles are all built from `settings`.
    pub fn from_settings(settings: ClientSettings) -> Self {
        Self::new(Arc::new(SettingsClientFactory::new(settings)))
    }

    /// Open a session with a fresh handle, replacing any existing one.
    ///
    /// The handle is built before the map is locked; no network call is made.
    pub fn register(&self, session_id: &str) -> Result<(), ApiError> {
        if session_id.is_empty() {
            return Err(ApiError::invalid_argument("session id must not be empty"));
        }

        let entry = Arc::new(SessionEntry::new(self.factory.build()?));
        let replaced = self
            .sessions
            .write()
            .insert(session_id.to_string(), entry)
            .is_some();

        info!(session_id, replaced, "Session registered");
        Ok(())
    }

    /// Drop a session. Unknown ids are ignored.
    ///
    /// Requests already holding a view of the old handle finish normally.
    pub fn unregister(&self, session_id: &str) {
        if self.sessions.write().remove(session_id).is_some() {
            info!(session_id, "Session unregistered");
        }
    }

    /// Client view for one request on `session_id`.
    ///
    /// Creates the session on first use. An empty `credential` means the
    /// request carries no `Authorization` header.
    pub fn resolve(&self, session_id: &str, credential: &str) -> Result<SessionClient, ApiError> {
        if session_id.is_empty() {
            return Err(ApiError::invalid_argument("session id must not be empty"));
        }

        let authorization = parse_credential(credential)?;
        let entry = self.entry_or_create(session_id)?;

        *entry.credential.lock() = authorization.clone();

        Ok(SessionClient::new(entry.client.clone(), authorization))
    }

    fn entry_or_create(&self, session_id: &str) -> Result<Arc<SessionEntry>, ApiError> {
        let existing = self.sessions.read().get(session_id).cloned();
        if let Some(entry) = existing {
            return Ok(entry);
        }

        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get(session_id) {
            return Ok(entry.clone());
        }

        let entry = Arc::new(SessionEntry::new(self.factory.build()?));
        sessions.insert(session_id.to_string(), entry.clone());
        debug!(session_id, "Session created on first use");
        Ok(entry)
    }

    /// Most recent credential recorded for `session_id`.
    pub fn last_credential(&self, session_id: &str) -> Option<HeaderValue> {
        let entry = self.sessions.read().get(session_id).cloned()?;
        let credential = entry.credential.lock().clone();
        credential
    }

    /// The shared handle currently bound to `session_id`.
    pub fn handle(&self, session_id: &str) -> Option<Arc<ApiClient>> {
        self.sessions
            .read()
            .get(session_id)
            .map(|entry| entry.client.clone())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

fn parse_credential(credential: &str) -> Result<Option<HeaderValue>, ApiError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Ok(None);
    }

    let mut value = HeaderValue::from_str(credential)
        .map_err(|_| ApiError::invalid_argument("authorization credential is not a valid header value"))?;
    value.set_sensitive(true);
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFactory {
        builds: AtomicUsize,
    }

    impl ClientFactory for CountingFactory {
        fn build(&self) -> Result<ApiClient, ApiError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            ApiClient::new(&ClientSettings::new("https://10.0.0.5:5007"))
        }
    }

    fn counting() -> (Arc<CountingFactory>, SessionRegistry) {
        let factory = Arc::new(CountingFactory {
            builds: AtomicUsize::new(0),
        });
        let registry = SessionRegistry::new(factory.clone());
        (factory, registry)
    }

    #[test]
    fn test_resolve_creates_lazily() {
        let (factory, registry) = counting();
        assert!(registry.is_empty());

        registry.resolve("s1", "").unwrap();
        registry.resolve("s1", "Bearer abc").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_applies_credential() {
        let (_, registry) = counting();

        let client = registry.resolve("s1", "Bearer abc").unwrap();
        let headers = client.request_headers(false);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");

        let client = registry.resolve("s1", "").unwrap();
        assert!(client.request_headers(false).get(AUTHORIZATION).is_none());
        assert!(registry.last_credential("s1").is_none());
    }

    #[test]
    fn test_sessions_do_not_share_credentials() {
        let (_, registry) = counting();

        let first = registry.resolve("s1", "Bearer one").unwrap();
        let second = registry.resolve("s2", "Bearer two").unwrap();

        assert_eq!(first.request_headers(false).get(AUTHORIZATION).unwrap(), "Bearer one");
        assert_eq!(second.request_headers(false).get(AUTHORIZATION).unwrap(), "Bearer two");
        assert!(!Arc::ptr_eq(first.handle(), second.handle()));
        assert_eq!(registry.last_credential("s1").unwrap(), "Bearer one");
    }

    #[test]
    fn test_register_replaces_handle() {
        let (factory, registry) = counting();

        registry.register("s1").unwrap();
        let before = registry.handle("s1").unwrap();
        registry.register("s1").unwrap();
        let after = registry.handle("s1").unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(registry.len(), 1);
        assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let (_, registry) = counting();
        registry.unregister("missing");
        registry.unregister("");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_unregister_resolve_builds_new_handle() {
        let (factory, registry) = counting();

        registry.register("s1").unwrap();
        let old = registry.handle("s1").unwrap();
        registry.unregister("s1");
        assert!(!registry.contains("s1"));

        let client = registry.resolve("s1", "Bearer abc").unwrap();
        assert!(!Arc::ptr_eq(&old, client.handle()));
        assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_session_id_rejected() {
        let (factory, registry) = counting();
        assert!(matches!(registry.register(""), Err(ApiError::InvalidArgument(_))));
        assert!(matches!(registry.resolve("", "Bearer abc"), Err(ApiError::InvalidArgument(_))));
        assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_credential_rejected() {
        let (_, registry) = counting();
        let err = registry.resolve("s1", "Bearer a\nb").unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_factory_failure_propagates() {
        let mut settings = ClientSettings::new("https://10.0.0.5:5007");
        settings.tls_skip_verify = true;
        settings.ca_cert_path = Some("/etc/ssl/ca.pem".into());
        let registry = SessionRegistry::from_settings(settings);

        assert!(matches!(registry.resolve("s1", ""), Err(ApiError::Configuration(_))));
        assert!(matches!(registry.register("s1"), Err(ApiError::Configuration(_))));
        assert!(registry.is_empty());
    }
}
