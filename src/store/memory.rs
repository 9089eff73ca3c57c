//! In-memory store.
//!
//! Each market lives in its own mutex-guarded slot, so operations on one
//! market are serialized while different markets proceed in parallel.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::MarketStore;
use crate::domain::{Market, MarketId, Order};
use crate::engine::MarketState;
use crate::error::{ExchangeError, Result};

#[derive(Debug)]
struct Slot {
    state: MarketState,
    orders: Vec<Order>,
}

/// Non-durable store backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    markets: DashMap<MarketId, Arc<Mutex<Slot>>>,
    slugs: DashMap<String, MarketId>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Clone the handle out so no map shard stays locked while the slot is held.
    fn slot(&self, id: &MarketId) -> Result<Arc<Mutex<Slot>>> {
        self.markets
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ExchangeError::market_not_found(id).into())
    }
}

impl MarketStore for MemoryStore {
    fn insert_market(&self, mut state: MarketState) -> Result<Market> {
        let market = state.market.clone();
        match self.slugs.entry(market.slug.clone()) {
            Entry::Occupied(_) => {
                return Err(ExchangeError::SlugConflict { slug: market.slug }.into());
            }
            Entry::Vacant(entry) => {
                entry.insert(market.id);
            }
        }

        let orders = state.take_journal();
        self.markets
            .insert(market.id, Arc::new(Mutex::new(Slot { state, orders })));
        Ok(market)
    }

    fn slug_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.slugs.contains_key(slug))
    }

    fn get_market(&self, id: &MarketId) -> Result<Market> {
        Ok(self.slot(id)?.lock().state.market.clone())
    }

    fn list_markets(&self) -> Result<Vec<Market>> {
        let slots: Vec<_> = self
            .markets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut markets: Vec<Market> = slots
            .iter()
            .map(|slot| slot.lock().state.market.clone())
            .collect();
        markets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(markets)
    }

    fn load(&self, id: &MarketId) -> Result<MarketState> {
        Ok(self.slot(id)?.lock().state.clone())
    }

    fn list_orders(&self, id: &MarketId) -> Result<Vec<Order>> {
        Ok(self.slot(id)?.lock().orders.clone())
    }

    fn transact<T, F>(&self, id: &MarketId, f: F) -> Result<T>
    where
        F: FnOnce(&mut MarketState) -> Result<T>,
    {
        let slot = self.slot(id)?;
        let mut slot = slot.lock();

        // Work on a copy; the committed state is only replaced on success.
        let mut working = slot.state.clone();
        let value = f(&mut working)?;

        let journal = working.take_journal();
        slot.orders.extend(journal);
        slot.state = working;
        Ok(value)
    }
}
