//! Market, ledger and book types shared by the engine, stores and CLI.

mod id;
mod market;
mod money;
mod order;
mod order_book;
mod position;
mod resolution;
mod side;

pub use id::{LevelId, MarketId, OrderId, ResolutionId};
pub use market::{Market, MarketStatus};
pub use money::{complement, notional, quantize, Money, Price, Quantity, HUNDRED, ZERO};
pub use order::{Order, OrderRequest};
pub use order_book::{LevelKey, OrderBook, OrderBookLevel};
pub use position::Position;
pub use resolution::Resolution;
pub use side::{OrderType, Outcome, ParseLabelError, Side};
