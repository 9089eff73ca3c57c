//! Per-side holdings with weighted-average cost basis.
//!
//! A market owns exactly one [`Position`] per [`Side`]. Buys blend into the
//! average price; sells realize P&L against it and never move it, except
//! that a fully closed position resets its basis to zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{notional, quantize, Money, Price, Quantity, ZERO};
use super::{MarketId, Side};
use crate::error::ExchangeError;

/// Holding on one side of one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub market_id: MarketId,
    pub side: Side,
    pub quantity: Quantity,
    /// Cost basis per contract; zero exactly when `quantity` is zero.
    pub average_price: Price,
    /// Cumulative P&L realized by sells and by settlement.
    pub realized_pnl: Money,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// A flat position, as created alongside its market.
    #[must_use]
    pub fn flat(market_id: MarketId, side: Side, now: DateTime<Utc>) -> Self {
        Self {
            market_id,
            side,
            quantity: 0,
            average_price: ZERO,
            realized_pnl: ZERO,
            updated_at: now,
        }
    }

    /// Whether no contracts are held.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Add `quantity` contracts bought at `price` to the lot.
    ///
    /// Never realizes P&L; the return value is always zero and exists so
    /// callers can treat buys and sells uniformly.
    pub fn apply_buy(&mut self, price: Price, quantity: Quantity) -> Money {
        let price = quantize(price);
        let new_quantity = self.quantity + quantity;
        self.average_price = if new_quantity == 0 {
            ZERO
        } else {
            let cost = notional(self.average_price, self.quantity) + notional(price, quantity);
            quantize(cost / Decimal::from(new_quantity))
        };
        self.quantity = new_quantity;
        ZERO
    }

    /// Remove `quantity` contracts sold at `price`, returning the realized P&L.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InsufficientPosition`] if more contracts are
    /// sold than held; the position is left untouched.
    pub fn apply_sell(&mut self, price: Price, quantity: Quantity) -> Result<Money, ExchangeError> {
        if quantity > self.quantity {
            return Err(ExchangeError::InsufficientPosition {
                side: self.side,
                requested: quantity,
                held: self.quantity,
            });
        }

        let realized = quantize(notional(quantize(price) - self.average_price, quantity));
        self.quantity -= quantity;
        if self.quantity == 0 {
            self.average_price = ZERO;
        }
        self.realized_pnl = quantize(self.realized_pnl + realized);
        Ok(realized)
    }

    /// Pay out the whole lot at `payout_price` and flatten the position.
    ///
    /// Returns the payout amount (`payout_price × quantity`).
    pub fn settle(&mut self, payout_price: Price) -> Money {
        let pnl = notional(payout_price - self.average_price, self.quantity);
        let payout = quantize(notional(payout_price, self.quantity));
        self.realized_pnl = quantize(self.realized_pnl + pnl);
        self.quantity = 0;
        self.average_price = ZERO;
        payout
    }

    /// The cost-basis invariant: average price is zero iff nothing is held.
    #[must_use]
    pub fn basis_is_consistent(&self) -> bool {
        (self.quantity == 0) == self.average_price.is_zero()
    }
}
