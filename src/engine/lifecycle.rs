//! Market creation.

use chrono::{DateTime, Utc};

use super::MarketState;
use crate::domain::{Market, MarketId, Price};
use crate::error::ExchangeError;

/// Open a market at `initial_yes_price` with one flat position per side.
///
/// The slug must already be unique; assigning it is the caller's concern.
///
/// # Errors
///
/// Returns [`ExchangeError::InvalidPrice`] unless the quantized price is
/// strictly between 0 and 100.
pub fn create_market(
    slug: &str,
    question: &str,
    description: Option<&str>,
    initial_yes_price: Price,
    now: DateTime<Utc>,
) -> Result<MarketState, ExchangeError> {
    let market = Market::open(
        MarketId::new(),
        slug,
        question,
        description.map(str::to_owned),
        initial_yes_price,
        now,
    )?;
    Ok(MarketState::new(market, now))
}
