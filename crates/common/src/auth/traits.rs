//! Traits for credential storage and token exchange
//!
//! These traits enable dependency injection and testing by abstracting the
//! two external dependencies of the credential lifecycle: where the current
//! credential lives, and how a new one is obtained.

use async_trait::async_trait;

use super::token_manager::CredentialError;
use super::types::Credential;

/// Holder of the current session credential.
///
/// Implementations must be cheap and non-blocking; the manager calls `get` on
/// every request.
pub trait CredentialStore: Send + Sync {
    /// Current credential, if one has been stored
    fn get(&self) -> Option<Credential>;

    /// Replace the stored credential
    fn set(&self, credential: Credential);

    /// Drop the stored credential so the next request re-authenticates
    fn clear(&self);
}

/// Client-credentials exchange against the token endpoint.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Obtain a fresh credential
    ///
    /// # Errors
    /// Returns [`CredentialError::Exchange`] if the call fails and
    /// [`CredentialError::Malformed`] if the response lacks a token or expiry.
    async fn exchange(&self) -> Result<Credential, CredentialError>;
}
