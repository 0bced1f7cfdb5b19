//! Credential types
//!
//! A [`Credential`] is the bearer token plus its absolute expiry. It is
//! replaced wholesale on every successful exchange and never patched in place.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::token_manager::CredentialError;

/// Bearer access token with an absolute expiry (epoch seconds, UTC).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Token sent as `Authorization: Bearer <token>`
    pub access_token: String,

    /// Absolute expiry as a Unix timestamp in seconds
    pub expires_at: i64,
}

impl Credential {
    /// Create a credential from a token and an absolute expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: i64) -> Self {
        Self { access_token: access_token.into(), expires_at }
    }

    /// Create a credential that expires `expires_in` seconds from now.
    #[must_use]
    pub fn expiring_in(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self::new(access_token, Utc::now().timestamp() + expires_in)
    }

    /// Whether the credential can still be sent at `now`.
    ///
    /// A credential is usable while `now + margin_seconds < expires_at`. A
    /// margin of zero reproduces the plain `now < expires_at` rule.
    #[must_use]
    pub fn is_usable_at(&self, now: i64, margin_seconds: i64) -> bool {
        now.saturating_add(margin_seconds) < self.expires_at
    }

    /// [`Self::is_usable_at`] against the current wall clock.
    #[must_use]
    pub fn is_usable(&self, margin_seconds: i64) -> bool {
        self.is_usable_at(Utc::now().timestamp(), margin_seconds)
    }

    /// Seconds left before expiry (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        self.expires_at - Utc::now().timestamp()
    }

    /// Build a credential from a token endpoint response observed at `now`.
    ///
    /// `expires_in` (relative) takes precedence over `expires_at` (absolute)
    /// when the server sends both.
    ///
    /// # Errors
    /// Returns [`CredentialError::Malformed`] if the token is missing or empty,
    /// or if neither expiry field is present.
    pub fn from_response(response: TokenResponse, now: i64) -> Result<Self, CredentialError> {
        let access_token = response
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| CredentialError::Malformed("missing access_token".into()))?;

        let expires_at = match (response.expires_in, response.expires_at) {
            (Some(expires_in), _) => now.saturating_add(expires_in),
            (None, Some(expires_at)) => expires_at,
            (None, None) => {
                return Err(CredentialError::Malformed(
                    "missing expires_in and expires_at".into(),
                ))
            }
        };

        Ok(Self { access_token, expires_at })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response body.
///
/// Every field is optional so a malformed payload deserializes and is then
/// rejected by [`Credential::from_response`] with a precise message.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub scope: Option<String>,
}
