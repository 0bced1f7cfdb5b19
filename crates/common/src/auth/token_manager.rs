//! Credential manager with single-flight refresh
//!
//! Manages the bearer token lifecycle:
//! - Cached credential read from a [`CredentialStore`]
//! - Client-credentials exchange when the credential is absent or expired
//! - One exchange per expiry even under concurrent callers

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::store::{process_refresh_lock, process_store};
use super::traits::{CredentialStore, TokenExchange};
use super::types::Credential;

/// Default safety margin applied before the recorded expiry.
pub const DEFAULT_EXPIRY_MARGIN_SECONDS: i64 = 0;

/// Error type for credential operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The exchange call failed (network, TLS, or non-success status)
    #[error("Credential exchange failed: {0}")]
    Exchange(String),

    /// The token endpoint answered without a usable token or expiry
    #[error("Malformed token response: {0}")]
    Malformed(String),
}

/// Token manager backed by an injectable store.
///
/// The read-check-write on the store is guarded by an async mutex, so callers
/// racing past an expired credential trigger a single exchange and all reuse
/// its result.
pub struct CredentialManager {
    exchange: Arc<dyn TokenExchange>,
    store: Arc<dyn CredentialStore>,
    refresh_lock: Arc<Mutex<()>>,
    expiry_margin_seconds: i64,
}

impl CredentialManager {
    /// Create a manager over a dedicated store.
    #[must_use]
    pub fn new(exchange: Arc<dyn TokenExchange>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            exchange,
            store,
            refresh_lock: Arc::new(Mutex::new(())),
            expiry_margin_seconds: DEFAULT_EXPIRY_MARGIN_SECONDS,
        }
    }

    /// Create a manager over the process-wide store and refresh lock.
    #[must_use]
    pub fn with_process_store(exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            exchange,
            store: process_store(),
            refresh_lock: process_refresh_lock(),
            expiry_margin_seconds: DEFAULT_EXPIRY_MARGIN_SECONDS,
        }
    }

    /// Share a refresh lock with other managers over the same store.
    #[must_use]
    pub fn refresh_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.refresh_lock = lock;
        self
    }

    /// Treat credentials as expired this many seconds early.
    #[must_use]
    pub fn expiry_margin(mut self, seconds: i64) -> Self {
        self.expiry_margin_seconds = seconds.max(0);
        self
    }

    /// Return a token that is valid now, exchanging for a new one if needed.
    ///
    /// # Errors
    /// Propagates the [`CredentialError`] from the exchange.
    pub async fn valid_token(&self) -> Result<String, CredentialError> {
        if let Some(token) = self.cached_token() {
            debug!("Using cached access token");
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached_token() {
            debug!("Access token refreshed by concurrent caller");
            return Ok(token);
        }

        let credential = self.exchange.exchange().await.map_err(|err| {
            warn!(error = %err, "Credential exchange failed");
            err
        })?;

        let token = credential.access_token.clone();
        info!(expires_at = credential.expires_at, "Refreshed access token");
        self.store.set(credential);

        Ok(token)
    }

    /// Current stored credential, usable or not
    #[must_use]
    pub fn current(&self) -> Option<Credential> {
        self.store.get()
    }

    /// Drop the stored credential so the next call exchanges again
    pub fn invalidate(&self) {
        self.store.clear();
        debug!("Stored credential cleared");
    }

    /// Get the expiry margin in seconds
    #[must_use]
    pub fn expiry_margin_seconds(&self) -> i64 {
        self.expiry_margin_seconds
    }

    fn cached_token(&self) -> Option<String> {
        self.store
            .get()
            .filter(|credential| credential.is_usable(self.expiry_margin_seconds))
            .map(|credential| credential.access_token)
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("expiry_margin_seconds", &self.expiry_margin_seconds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::token_manager.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::auth::InMemoryCredentialStore;

    struct CountingExchange {
        calls: AtomicUsize,
        outcome: Result<i64, CredentialError>,
    }

    impl CountingExchange {
        fn ok(expires_in: i64) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), outcome: Ok(expires_in) })
        }

        fn failing(err: CredentialError) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), outcome: Err(err) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenExchange for CountingExchange {
        async fn exchange(&self) -> Result<Credential, CredentialError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.outcome.clone().map(|expires_in| Credential::expiring_in(format!("fresh-{n}"), expires_in))
        }
    }

    /// Validates the cached credential scenario.
    ///
    /// Assertions:
    /// - The cached token is returned unchanged.
    /// - The exchange is never called.
    #[tokio::test]
    async fn test_valid_cached_credential_skips_exchange() {
        let exchange = CountingExchange::ok(3600);
        let store = Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in("cached", 3600)));
        let manager = CredentialManager::new(exchange.clone(), store);

        assert_eq!(manager.valid_token().await.unwrap(), "cached");
        assert_eq!(manager.valid_token().await.unwrap(), "cached");
        assert_eq!(exchange.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_credential_exchanges_once_and_caches() {
        let exchange = CountingExchange::ok(3600);
        let store = Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in("stale", -10)));
        let manager = CredentialManager::new(exchange.clone(), store.clone());

        assert_eq!(manager.valid_token().await.unwrap(), "fresh-1");
        assert_eq!(manager.valid_token().await.unwrap(), "fresh-1");
        assert_eq!(exchange.calls(), 1);
        assert_eq!(store.get().map(|c| c.access_token), Some("fresh-1".to_string()));
    }

    #[tokio::test]
    async fn test_absent_credential_exchanges() {
        let exchange = CountingExchange::ok(3600);
        let manager =
            CredentialManager::new(exchange.clone(), Arc::new(InMemoryCredentialStore::new()));

        assert_eq!(manager.valid_token().await.unwrap(), "fresh-1");
        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn test_margin_triggers_early_refresh() {
        let exchange = CountingExchange::ok(3600);
        let store = Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in("soon", 20)));
        let manager = CredentialManager::new(exchange.clone(), store).expiry_margin(60);

        assert_eq!(manager.valid_token().await.unwrap(), "fresh-1");
        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn test_exchange_failure_leaves_store_untouched() {
        let exchange = CountingExchange::failing(CredentialError::Exchange("HTTP 401".into()));
        let store = Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in("stale", -1)));
        let manager = CredentialManager::new(exchange.clone(), store.clone());

        let err = manager.valid_token().await.unwrap_err();
        assert_eq!(err, CredentialError::Exchange("HTTP 401".into()));
        assert_eq!(store.get().map(|c| c.access_token), Some("stale".to_string()));

        // No negative caching: the next call tries again.
        let _ = manager.valid_token().await;
        assert_eq!(exchange.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_exchange() {
        let exchange = CountingExchange::ok(3600);
        let store = Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in("cached", 3600)));
        let manager = CredentialManager::new(exchange.clone(), store);

        manager.invalidate();
        assert!(manager.current().is_none());
        assert_eq!(manager.valid_token().await.unwrap(), "fresh-1");
    }
}
