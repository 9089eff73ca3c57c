//! Predicta - a binary prediction market exchange.
//!
//! Every market trades two complementary instruments, YES and NO, whose
//! prices always sum to 100. Orders are matched against resting sell-side
//! liquidity, positions carry a weighted-average cost basis, and resolving
//! a market pays out every position exactly once.
//!
//! # Modules
//!
//! - [`domain`] - Money, positions, order book and market records
//! - [`engine`] - Matching, settlement and market creation over one market's state
//! - [`store`] - Per-market atomic persistence (in-memory and SQLite)
//! - [`service`] - The validated [`service::Exchange`] entry points
//! - [`config`] - Configuration loading from TOML with environment overrides
//! - [`cli`] - The `predicta` command-line adapter
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use predicta::domain::{OrderRequest, Side};
//! use predicta::service::{Exchange, ExchangeSettings, NewMarket};
//! use predicta::store::MemoryStore;
//! use rust_decimal_macros::dec;
//!
//! let exchange = Exchange::new(MemoryStore::new(), ExchangeSettings::default());
//! let market = exchange
//!     .create_market(&NewMarket::new("Will it rain tomorrow?", dec!(60)))
//!     .unwrap();
//! let order = exchange
//!     .place_order(&market.id, &OrderRequest::buy(Side::Yes, dec!(60), 10))
//!     .unwrap();
//! assert_eq!(order.quantity, 10);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
