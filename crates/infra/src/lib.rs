//! # Bankly Infrastructure
//!
//! HTTP implementation of the Bankly banking-as-a-service client.
//!
//! This crate contains:
//! - Transport: reqwest clients with optional mutual TLS
//! - Request orchestration: auth, correlation ids, header merge, dispatch
//! - The [`Bankly`] facade with one method per API operation
//! - Configuration loading from the environment or files
//!
//! ## Architecture
//! - Payload types and errors come from `bankly-domain`
//! - The credential cache comes from `bankly-common`
//! - Contains all "impure" code (network, files, environment)

pub mod api;
pub mod bankly;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiClient, CallOptions, RawResponse, RequestBody};
pub use bankly::{Bankly, BanklyBuilder};
pub use errors::InfraError;
pub use http::{ClientPool, HttpClient, HttpSettings};
