//! Session registry behavior under concurrency.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use pce_mcp_server::api::{ApiClient, ApiError, ClientSettings};
use pce_mcp_server::core::session::{ClientFactory, SessionRegistry};

struct CountingFactory {
    settings: ClientSettings,
    builds: AtomicUsize,
}

impl CountingFactory {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            settings: ClientSettings::new("https://10.0.0.5:5007"),
            builds: AtomicUsize::new(0),
        })
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ClientFactory for CountingFactory {
    fn build(&self) -> Result<ApiClient, ApiError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        ApiClient::new(&self.settings)
    }
}

#[test]
fn concurrent_resolve_builds_once() {
    let factory = CountingFactory::new();
    let registry = Arc::new(SessionRegistry::new(factory.clone()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let credential = format!("Bearer token-{i}");
                registry.resolve("shared", &credential).unwrap()
            })
        })
        .collect();

    let clients: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(factory.builds(), 1);
    assert_eq!(registry.len(), 1);
    for client in &clients[1..] {
        assert!(Arc::ptr_eq(client.handle(), clients[0].handle()));
    }
}

#[test]
fn concurrent_sessions_keep_their_own_credentials() {
    let factory = CountingFactory::new();
    let registry = Arc::new(SessionRegistry::new(factory.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let session = format!("session-{i}");
                let credential = format!("Bearer token-{i}");
                for _ in 0..50 {
                    let client = registry.resolve(&session, &credential).unwrap();
                    let sent = client.request_headers(false);
                    assert_eq!(sent.get("authorization").unwrap(), credential.as_str());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(factory.builds(), 8);
    assert_eq!(registry.len(), 8);
}

#[test]
fn unregistered_session_is_rebuilt_fresh() {
    let factory = CountingFactory::new();
    let registry = SessionRegistry::new(factory.clone());

    registry.register("s1").unwrap();
    let first = registry.resolve("s1", "Bearer abc").unwrap();
    registry.unregister("s1");
    assert!(!registry.contains("s1"));

    let second = registry.resolve("s1", "").unwrap();
    assert_eq!(factory.builds(), 2);
    assert!(!Arc::ptr_eq(first.handle(), second.handle()));
    assert!(second.authorization().is_none());
    assert!(registry.last_credential("s1").is_none());
}
