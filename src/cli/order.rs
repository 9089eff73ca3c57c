//! Handlers for `predicta order`.

use tabled::Tabled;

use super::output;
use crate::domain::{MarketId, Order, OrderRequest};
use crate::error::Result;
use crate::service::Exchange;
use crate::store::MarketStore;

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Time")]
    created_at: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Type")]
    order_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Filled")]
    quantity: u64,
    #[tabled(rename = "Resting")]
    resting_quantity: u64,
    #[tabled(rename = "Cost")]
    total_cost: String,
    #[tabled(rename = "P&L")]
    realized_pnl: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            created_at: order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            side: order.side.to_string(),
            order_type: order.order_type.to_string(),
            price: order.price.to_string(),
            quantity: order.quantity,
            resting_quantity: order.resting_quantity,
            total_cost: order.total_cost.to_string(),
            realized_pnl: output::signed(order.realized_pnl),
        }
    }
}

/// Execute `order place`.
pub fn place<S: MarketStore>(
    exchange: &Exchange<S>,
    market_id: &MarketId,
    request: &OrderRequest,
) -> Result<()> {
    let order = exchange.place_order(market_id, request)?;
    if output::is_json() {
        return output::json(&order);
    }

    output::success(&format!(
        "{} {} filled {} of {} @ {}",
        order.order_type, order.side, order.quantity, order.requested_quantity, order.price
    ));
    output::field("Order", order.id);
    output::field("Total cost", order.total_cost);
    output::field("Realized P&L", output::signed(order.realized_pnl));
    if order.resting_quantity > 0 {
        output::field("Resting", order.resting_quantity);
    }
    Ok(())
}

/// Execute `order list`.
pub fn list<S: MarketStore>(exchange: &Exchange<S>, market_id: &MarketId) -> Result<()> {
    let orders = exchange.list_orders(market_id)?;
    if output::is_json() {
        return output::json(&orders);
    }
    output::table::<OrderRow>(orders.iter().map(OrderRow::from).collect(), "No orders yet");
    Ok(())
}
