//! Shared test fixtures for RapidSetup crates.
//!
//! This crate provides an in-memory store and builders for testing.
//! It does NOT depend on `rapidsetup-constraint` to avoid circular dependencies.
//!
//! - [`store`] - In-memory [`TriggerStore`](rapidsetup_core::TriggerStore) that records calls
//! - [`filter`] - Builders for raw trigger-filter trees
//! - [`identity`] - Identity snapshot fixtures
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rapidsetup-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use rapidsetup_test::filter::{and, attribute, static_leaf};
//! use rapidsetup_test::store::InMemoryStore;
//! ```

pub mod filter;
pub mod identity;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use identity::{employee, service_account};
pub use store::InMemoryStore;
