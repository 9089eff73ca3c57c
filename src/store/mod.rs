//! Persistence with pluggable storage backends.
//!
//! A store owns every [`MarketState`] and is the serialization boundary of
//! the exchange: [`MarketStore::transact`] runs one read-modify-write over a
//! single market atomically. Two units on the same market never interleave;
//! units on different markets may run in parallel.

mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Market, MarketId, Order};
use crate::engine::MarketState;
use crate::error::Result;

/// Storage operations for markets and everything they own.
pub trait MarketStore: Send + Sync {
    /// Persist a newly created market with its positions.
    ///
    /// Fails with [`crate::error::ExchangeError::SlugConflict`] if the slug
    /// is already taken, even when a concurrent insert claimed it first.
    fn insert_market(&self, state: MarketState) -> Result<Market>;

    /// Whether any market already uses `slug`.
    fn slug_exists(&self, slug: &str) -> Result<bool>;

    /// Fetch one market, or `NotFound`.
    fn get_market(&self, id: &MarketId) -> Result<Market>;

    /// All markets, newest first.
    fn list_markets(&self) -> Result<Vec<Market>>;

    /// A consistent snapshot of one market.
    fn load(&self, id: &MarketId) -> Result<MarketState>;

    /// Every order executed on a market, in execution order.
    fn list_orders(&self, id: &MarketId) -> Result<Vec<Order>>;

    /// Run `f` as one atomic unit of work on a market.
    ///
    /// `f` sees the latest committed state. Its changes, including orders
    /// journaled on the state, are committed only if it returns `Ok`; on
    /// `Err` nothing is written.
    fn transact<T, F>(&self, id: &MarketId, f: F) -> Result<T>
    where
        F: FnOnce(&mut MarketState) -> Result<T>;
}
