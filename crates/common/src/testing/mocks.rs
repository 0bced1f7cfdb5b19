//! Mock implementations of the credential traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{Credential, CredentialError, InMemoryCredentialStore, TokenExchange};

type Script = Arc<Mutex<VecDeque<Result<Credential, CredentialError>>>>;

/// Mock token exchange that counts calls and replays scripted outcomes
///
/// Once the script runs out, every call returns a fresh one-hour credential
/// named `token-<n>` where `n` is the call number.
///
/// # Examples
///
/// ```
/// use bankly_common::testing::MockTokenExchange;
///
/// let exchange = MockTokenExchange::new();
/// assert_eq!(exchange.calls(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTokenExchange {
    script: Script,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockTokenExchange {
    /// Create a mock that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unscripted call
    pub fn push(&self, outcome: Result<Credential, CredentialError>) {
        self.script.lock().push_back(outcome);
    }

    /// Sleep before answering, to widen race windows in concurrency tests
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of exchanges performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for MockTokenExchange {
    async fn exchange(&self) -> Result<Credential, CredentialError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(Credential::expiring_in(format!("token-{call}"), 3600)))
    }
}

/// Store pre-seeded with a credential expiring `expires_in` seconds from now
///
/// Pass a negative value for an already expired credential.
pub fn seeded_store(token: &str, expires_in: i64) -> Arc<InMemoryCredentialStore> {
    Arc::new(InMemoryCredentialStore::seeded(Credential::expiring_in(token, expires_in)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;

    #[tokio::test]
    async fn scripted_outcomes_are_replayed_in_order() {
        let exchange = MockTokenExchange::new();
        exchange.push(Err(CredentialError::Exchange("boom".into())));
        exchange.push(Ok(Credential::new("scripted", 99)));

        assert!(exchange.exchange().await.is_err());
        assert_eq!(exchange.exchange().await.unwrap(), Credential::new("scripted", 99));
        assert_eq!(exchange.exchange().await.unwrap().access_token, "token-3");
        assert_eq!(exchange.calls(), 3);
    }

    #[test]
    fn seeded_store_holds_credential() {
        let store = seeded_store("seed", -5);
        let credential = store.get().unwrap();
        assert_eq!(credential.access_token, "seed");
        assert!(!credential.is_usable(0));
    }
}
