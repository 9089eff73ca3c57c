//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Market state fixtures and invariant checks.
//! - [`exchange`] - Ready-made exchanges over an in-memory store.

pub mod domain;
pub mod exchange;
