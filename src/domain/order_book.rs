//! Resting sell-side liquidity for one market.
//!
//! Each side keeps its levels in a `BTreeMap` keyed by price, then by an
//! insertion sequence number, so iteration order is exactly price-time
//! priority and never depends on wall-clock resolution. Levels are not
//! coalesced: every resting sell is its own level.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Price, Quantity};
use super::{LevelId, MarketId, Side};

/// Sort key of a level within its side: lowest price, then earliest arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LevelKey {
    pub price: Price,
    pub sequence: u64,
}

/// An unfilled sell quantity waiting at a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub id: LevelId,
    pub market_id: MarketId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    /// Arrival order within the market; the time-priority tie-break.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
}

impl OrderBookLevel {
    #[must_use]
    pub const fn key(&self) -> LevelKey {
        LevelKey {
            price: self.price,
            sequence: self.sequence,
        }
    }
}

/// Both sides of resting liquidity for a single market.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBook {
    market_id: MarketId,
    yes: BTreeMap<LevelKey, OrderBookLevel>,
    no: BTreeMap<LevelKey, OrderBookLevel>,
    next_sequence: u64,
}

impl OrderBook {
    /// Create an empty book.
    #[must_use]
    pub fn new(market_id: MarketId) -> Self {
        Self {
            market_id,
            yes: BTreeMap::new(),
            no: BTreeMap::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild a book from persisted levels.
    ///
    /// Levels with a non-positive quantity are dropped. The sequence counter
    /// resumes after both `next_sequence` and the highest stored sequence.
    #[must_use]
    pub fn restore(
        market_id: MarketId,
        levels: impl IntoIterator<Item = OrderBookLevel>,
        next_sequence: u64,
    ) -> Self {
        let mut book = Self::new(market_id);
        book.next_sequence = next_sequence.max(1);
        for level in levels.into_iter().filter(|l| l.quantity > 0) {
            book.next_sequence = book.next_sequence.max(level.sequence + 1);
            book.side_mut(level.side).insert(level.key(), level);
        }
        book
    }

    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    /// The sequence number the next inserted level will receive.
    #[must_use]
    pub const fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    fn side(&self, side: Side) -> &BTreeMap<LevelKey, OrderBookLevel> {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<LevelKey, OrderBookLevel> {
        match side {
            Side::Yes => &mut self.yes,
            Side::No => &mut self.no,
        }
    }

    /// Cheapest level on `side` priced at or above `min_price`, earliest first on ties.
    #[must_use]
    pub fn best_match(&self, side: Side, min_price: Price) -> Option<&OrderBookLevel> {
        let from = LevelKey {
            price: min_price,
            sequence: 0,
        };
        self.side(side).range(from..).next().map(|(_, level)| level)
    }

    /// Take `quantity` from the level at `key`, removing it once exhausted.
    ///
    /// Returns the quantity left on the level, or `None` if no such level exists.
    pub fn consume(&mut self, side: Side, key: LevelKey, quantity: Quantity) -> Option<Quantity> {
        let levels = self.side_mut(side);
        let level = levels.get_mut(&key)?;
        let left = level.quantity.saturating_sub(quantity);
        if left == 0 {
            levels.remove(&key);
        } else {
            level.quantity = left;
        }
        Some(left)
    }

    /// Rest a new level at `price`. Zero quantity creates nothing.
    pub fn insert(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> Option<&OrderBookLevel> {
        if quantity == 0 {
            return None;
        }
        let level = OrderBookLevel {
            id: LevelId::new(),
            market_id: self.market_id,
            side,
            price,
            quantity,
            sequence: self.next_sequence,
            created_at: now,
        };
        self.next_sequence += 1;
        let key = level.key();
        let levels = self.side_mut(side);
        levels.insert(key, level);
        levels.get(&key)
    }

    /// All levels ordered by side (NO before YES), then price, then arrival.
    pub fn levels(&self) -> impl Iterator<Item = &OrderBookLevel> {
        self.no.values().chain(self.yes.values())
    }

    /// Total resting quantity on one side.
    #[must_use]
    pub fn depth(&self, side: Side) -> Quantity {
        self.side(side).values().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.yes.len() + self.no.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }
}
