//! Shared building blocks for the Bankly client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `auth`: credential store, token exchange seam, credential manager
//! - `test-utils`: mock exchange and pre-seeded stores for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "auth")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "auth")))]
pub mod testing;

#[cfg(feature = "auth")]
pub use auth::{Credential, CredentialError, CredentialManager, CredentialStore, TokenExchange};
