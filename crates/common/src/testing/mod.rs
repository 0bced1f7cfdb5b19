//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of the credential traits
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bankly_common::auth::CredentialManager;
//! use bankly_common::testing::{seeded_store, MockTokenExchange};
//!
//! let exchange = MockTokenExchange::new();
//! let manager = CredentialManager::new(Arc::new(exchange.clone()), seeded_store("old", -1));
//! # let _ = manager;
//! ```

pub mod mocks;

pub use mocks::{seeded_store, MockTokenExchange};
