//! Handlers for `predicta positions` and `predicta book`.

use tabled::Tabled;

use super::output;
use crate::domain::{MarketId, OrderBookLevel, Position};
use crate::error::Result;
use crate::service::Exchange;
use crate::store::MarketStore;

#[derive(Tabled)]
pub(crate) struct PositionRow {
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Quantity")]
    quantity: u64,
    #[tabled(rename = "Avg Price")]
    average_price: String,
    #[tabled(rename = "Realized P&L")]
    realized_pnl: String,
}

impl From<&Position> for PositionRow {
    fn from(position: &Position) -> Self {
        Self {
            side: position.side.to_string(),
            quantity: position.quantity,
            average_price: position.average_price.to_string(),
            realized_pnl: output::signed(position.realized_pnl),
        }
    }
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Quantity")]
    quantity: u64,
    #[tabled(rename = "Seq")]
    sequence: u64,
}

impl From<&OrderBookLevel> for LevelRow {
    fn from(level: &OrderBookLevel) -> Self {
        Self {
            side: level.side.to_string(),
            price: level.price.to_string(),
            quantity: level.quantity,
            sequence: level.sequence,
        }
    }
}

/// Execute `positions`.
pub fn positions<S: MarketStore>(exchange: &Exchange<S>, market_id: &MarketId) -> Result<()> {
    let positions = exchange.list_positions(market_id)?;
    if output::is_json() {
        return output::json(&positions);
    }
    output::table(positions.iter().map(PositionRow::from).collect(), "No positions");
    Ok(())
}

/// Execute `book`.
pub fn book<S: MarketStore>(exchange: &Exchange<S>, market_id: &MarketId) -> Result<()> {
    let levels = exchange.list_order_book(market_id)?;
    if output::is_json() {
        return output::json(&levels);
    }
    output::table::<LevelRow>(levels.iter().map(LevelRow::from).collect(), "Order book is empty");
    Ok(())
}
