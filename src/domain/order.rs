//! Incoming order requests and the immutable execution records they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Money, Price, Quantity};
use super::{MarketId, OrderId, OrderType, Side};

/// A limit order as submitted by a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderRequest {
    #[must_use]
    pub const fn buy(side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            side,
            order_type: OrderType::Buy,
            price,
            quantity,
        }
    }

    #[must_use]
    pub const fn sell(side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            side,
            order_type: OrderType::Sell,
            price,
            quantity,
        }
    }
}

/// Append-only record of what an order did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub market_id: MarketId,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Quantity-weighted average fill price, or the limit price if nothing executed.
    pub price: Price,
    /// Executed quantity.
    pub quantity: Quantity,
    /// Unfilled remainder that became a new order book level (sells only).
    pub resting_quantity: Quantity,
    pub requested_quantity: Quantity,
    pub total_cost: Money,
    pub realized_pnl: Money,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Executed plus resting quantity always equals the requested quantity.
    #[must_use]
    pub const fn is_conserved(&self) -> bool {
        self.quantity + self.resting_quantity == self.requested_quantity
    }
}
