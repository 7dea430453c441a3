//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! water billing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built billing parameters, costs and dates
//! - `builders`: Builder for unit records
//! - `doubles`: In-memory dataset and stub meter reader
//! - `assertions`: Custom assertion helpers for billing results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
