//! Market state fixtures and invariant checks.

use chrono::Utc;

use crate::domain::{Price, HUNDRED};
use crate::engine::{create_market, MarketState};

/// A fresh market state quoted at `yes_price`.
///
/// # Panics
///
/// Panics if `yes_price` is not strictly between 0 and 100.
pub fn market_state(yes_price: Price) -> MarketState {
    create_market("test-market", "Test market?", None, yes_price, Utc::now())
        .expect("valid initial price")
}

/// Assert every data-model invariant on `state`, naming the one that broke.
///
/// # Panics
///
/// Panics if an invariant does not hold.
pub fn assert_invariants(state: &MarketState) {
    let market = &state.market;
    if market.is_open() {
        assert_eq!(
            market.yes_price + market.no_price,
            HUNDRED,
            "prices of open market must sum to 100"
        );
    }
    for position in state.positions() {
        assert_eq!(
            position.quantity == 0,
            position.average_price.is_zero(),
            "{} basis must be zero exactly when flat: {position:?}",
            position.side
        );
    }
    for level in state.book.levels() {
        assert!(level.quantity > 0, "empty level left on book: {level:?}");
    }
    assert_eq!(
        market.is_open(),
        state.resolution.is_none(),
        "resolution must exist exactly when resolved"
    );
}
