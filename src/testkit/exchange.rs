//! Ready-made exchanges for service-level tests.

use rust_decimal_macros::dec;

use crate::domain::{Market, Price};
use crate::service::{Exchange, ExchangeSettings, NewMarket};
use crate::store::{MarketStore, MemoryStore};

/// An exchange over an empty in-memory store with default settings.
pub fn memory_exchange() -> Exchange<MemoryStore> {
    Exchange::new(MemoryStore::new(), ExchangeSettings::default())
}

/// Create a market on `exchange` at `yes_price` with a generated slug.
///
/// # Panics
///
/// Panics if creation fails.
pub fn open_market<S: MarketStore>(
    exchange: &Exchange<S>,
    question: &str,
    yes_price: Price,
) -> Market {
    exchange
        .create_market(&NewMarket::new(question, yes_price))
        .expect("create market")
}

/// Create a 50/50 market on `exchange`.
///
/// # Panics
///
/// Panics if creation fails.
pub fn even_market<S: MarketStore>(exchange: &Exchange<S>) -> Market {
    open_market(exchange, "Will the coin land heads?", dec!(50))
}
