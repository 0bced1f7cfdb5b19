//! # Bankly Domain
//!
//! Request payloads, validation and error types for the Bankly client.
//!
//! This crate contains:
//! - Payload types with field validation (customers, transfers, PIX, billets)
//! - The `BanklyError` taxonomy and `Result` alias
//! - Client configuration structures
//! - Protocol constants (headers, defaults, correlation-id exemptions)
//!
//! ## Architecture
//! - No dependencies on other Bankly crates
//! - No I/O: everything here is plain data

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{FieldError, ValidationError, ValidationResult, Validator};
