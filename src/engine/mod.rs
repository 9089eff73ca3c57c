//! The matching, position-ledger and settlement engine.
//!
//! Every operation here is a synchronous transition over one
//! [`MarketState`]. The engine never touches storage: callers load a state,
//! run an operation against it and commit the result only when it returns
//! `Ok` (see [`crate::store::MarketStore::transact`]). Operations validate
//! before mutating, so a rejected call leaves the state as it was.

mod lifecycle;
mod matching;
mod settlement;

pub use lifecycle::create_market;
pub use matching::place_order;
pub use settlement::resolve;

use chrono::{DateTime, Utc};

use crate::domain::{Market, Order, OrderBook, Position, Resolution, Side};

/// Everything a single market owns, loaded and committed as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketState {
    pub market: Market,
    positions: [Position; 2],
    pub book: OrderBook,
    pub resolution: Option<Resolution>,
    journal: Vec<Order>,
}

impl MarketState {
    /// Fresh state for a just-created market: flat positions, empty book.
    #[must_use]
    pub fn new(market: Market, now: DateTime<Utc>) -> Self {
        let positions = Side::ALL.map(|side| Position::flat(market.id, side, now));
        let book = OrderBook::new(market.id);
        Self {
            market,
            positions,
            book,
            resolution: None,
            journal: Vec::new(),
        }
    }

    /// Reassemble a state from stored parts.
    ///
    /// A side missing from `positions` is restored flat.
    #[must_use]
    pub fn from_parts(
        market: Market,
        positions: impl IntoIterator<Item = Position>,
        book: OrderBook,
        resolution: Option<Resolution>,
    ) -> Self {
        let now = market.updated_at;
        let mut state = Self::new(market, now);
        for position in positions {
            let slot = position.side.index();
            state.positions[slot] = position;
        }
        state.book = book;
        state.resolution = resolution;
        state
    }

    #[must_use]
    pub fn position(&self, side: Side) -> &Position {
        &self.positions[side.index()]
    }

    pub(crate) fn position_mut(&mut self, side: Side) -> &mut Position {
        &mut self.positions[side.index()]
    }

    /// Both positions in listing order (NO, then YES).
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = self.positions.to_vec();
        positions.sort_by_key(|p| p.side);
        positions
    }

    /// Orders executed since the state was loaded.
    #[must_use]
    pub fn journal(&self) -> &[Order] {
        &self.journal
    }

    /// Drain the order journal for persistence.
    pub fn take_journal(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.journal)
    }

    pub(crate) fn record(&mut self, order: Order) {
        self.journal.push(order);
    }

    /// Whether every invariant of the data model holds for this market.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let prices_ok = !self.market.is_open() || self.market.prices_are_complementary();
        let basis_ok = self.positions.iter().all(Position::basis_is_consistent);
        let book_ok = self.book.levels().all(|l| l.quantity > 0);
        let resolution_ok = self.market.is_open() == self.resolution.is_none();
        prices_ok && basis_ok && book_ok && resolution_ok
    }
}
