//! In-memory credential store and the process-wide default

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::traits::CredentialStore;
use super::types::Credential;

static PROCESS_STORE: Lazy<Arc<InMemoryCredentialStore>> =
    Lazy::new(|| Arc::new(InMemoryCredentialStore::new()));

static PROCESS_REFRESH_LOCK: Lazy<Arc<tokio::sync::Mutex<()>>> =
    Lazy::new(|| Arc::new(tokio::sync::Mutex::new(())));

/// Credential store backed by a lock-protected slot.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `credential`
    #[must_use]
    pub fn seeded(credential: Credential) -> Self {
        Self { slot: RwLock::new(Some(credential)) }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.slot.read().clone()
    }

    fn set(&self, credential: Credential) {
        *self.slot.write() = Some(credential);
    }

    fn clear(&self) {
        *self.slot.write() = None;
    }
}

/// The store shared by every client in the process that does not supply its
/// own.
#[must_use]
pub fn process_store() -> Arc<dyn CredentialStore> {
    PROCESS_STORE.clone()
}

/// Refresh lock paired with [`process_store`].
///
/// Managers sharing the process store must also share this lock, otherwise
/// each client would refresh independently.
#[must_use]
pub fn process_refresh_lock() -> Arc<tokio::sync::Mutex<()>> {
    PROCESS_REFRESH_LOCK.clone()
}
