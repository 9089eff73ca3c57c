//! One-time market resolution.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::MarketState;
use crate::domain::{Outcome, Resolution, ResolutionId, Side, HUNDRED, ZERO};
use crate::error::ExchangeError;

/// Settle every position at 100 (winning side) or 0 and close the market.
///
/// Resting book levels are left in place; a resolved market accepts no
/// further orders, so they can never match again.
///
/// # Errors
///
/// Returns [`ExchangeError::AlreadyResolved`] if the market is not open.
/// The state is unchanged in that case.
pub fn resolve(
    state: &mut MarketState,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> Result<Resolution, ExchangeError> {
    let market_id = state.market.id;
    if !state.market.is_open() {
        return Err(ExchangeError::AlreadyResolved { market_id });
    }

    let mut payout_yes = ZERO;
    let mut payout_no = ZERO;
    for side in Side::ALL {
        let payout_price = if side == outcome { HUNDRED } else { ZERO };
        let position = state.position_mut(side);
        let held = position.quantity;
        let payout = position.settle(payout_price);
        position.updated_at = now;
        match side {
            Side::Yes => payout_yes += payout,
            Side::No => payout_no += payout,
        }
        debug!(market_id = %market_id, side = %side, quantity = held, payout = %payout, "Settled position");
    }

    state.market.resolve(outcome, now)?;
    let resolution = Resolution {
        id: ResolutionId::new(),
        market_id,
        outcome,
        payout_yes,
        payout_no,
        created_at: now,
    };
    state.resolution = Some(resolution.clone());
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Market, MarketId, MarketStatus, OrderRequest};
    use crate::engine::place_order;
    use rust_decimal_macros::dec;

    fn traded_state() -> MarketState {
        let now = Utc::now();
        let market =
            Market::open(MarketId::new(), "rain", "Will it rain?", None, dec!(60.00), now).unwrap();
        let mut state = MarketState::new(market, now);
        place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(60.00), 10), now).unwrap();
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(40.00), 4), now).unwrap();
        state
    }

    #[test]
    fn winning_side_pays_hundred_losing_side_pays_nothing() {
        let mut state = traded_state();

        let resolution = resolve(&mut state, Side::Yes, Utc::now()).unwrap();

        assert_eq!(resolution.outcome, Side::Yes);
        assert_eq!(resolution.payout_yes, dec!(1000.00));
        assert_eq!(resolution.payout_no, dec!(0.00));
        assert_eq!(state.position(Side::Yes).realized_pnl, dec!(400.00));
        assert_eq!(state.position(Side::No).realized_pnl, dec!(-160.00));
        assert_eq!(state.market.status, MarketStatus::Resolved);
        assert_eq!(state.market.outcome, Some(Side::Yes));
        assert!(state.is_consistent());
    }

    #[test]
    fn every_position_is_flat_after_settlement() {
        let mut state = traded_state();
        resolve(&mut state, Side::No, Utc::now()).unwrap();

        for position in state.positions() {
            assert_eq!(position.quantity, 0);
            assert_eq!(position.average_price, dec!(0.00));
        }
        assert_eq!(state.resolution.as_ref().unwrap().payout_no, dec!(400.00));
    }

    #[test]
    fn second_resolution_fails_and_changes_nothing() {
        let mut state = traded_state();
        resolve(&mut state, Side::Yes, Utc::now()).unwrap();
        let before = state.clone();

        let err = resolve(&mut state, Side::No, Utc::now()).unwrap_err();

        assert_eq!(
            err,
            ExchangeError::AlreadyResolved {
                market_id: state.market.id
            }
        );
        assert_eq!(state, before);
    }
}
