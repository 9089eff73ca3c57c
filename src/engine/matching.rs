//! Limit order matching against resting liquidity.
//!
//! A YES order trades against resting NO levels and vice versa: a level
//! offering NO at `p` is the same contract pair as YES at `100 - p`. An
//! incoming order at limit `L` therefore matches opposite levels priced at
//! or above `complement(L)`, cheapest first.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::MarketState;
use crate::domain::{
    complement, notional, quantize, Money, Order, OrderId, OrderRequest, OrderType, Price,
    Quantity, Side, HUNDRED, ZERO,
};
use crate::error::ExchangeError;

/// Execute `request` against the market, returning its execution record.
///
/// Unmatched BUY quantity is backstop-filled at the limit price. Unmatched
/// SELL quantity rests on the book as a new level. The produced order is
/// also appended to the state's journal.
///
/// # Errors
///
/// - [`ExchangeError::MarketClosed`] if the market is resolved
/// - [`ExchangeError::InvalidPrice`] if the limit is outside `[0, 100]`
/// - [`ExchangeError::InsufficientPosition`] if a sell exceeds the holding
///
/// Nothing is mutated when an error is returned.
pub fn place_order(
    state: &mut MarketState,
    request: &OrderRequest,
    now: DateTime<Utc>,
) -> Result<Order, ExchangeError> {
    let market_id = state.market.id;
    if !state.market.is_open() {
        return Err(ExchangeError::MarketClosed { market_id });
    }

    // Bounds apply to the submitted price, before rounding can pull it in.
    let limit_price = quantize(request.price);
    let in_range = |p: Price| p >= ZERO && p <= HUNDRED;
    if !in_range(request.price) || !in_range(limit_price) {
        return Err(ExchangeError::InvalidPrice {
            price: request.price,
            reason: "order price must be between 0 and 100",
        });
    }

    let side = request.side;
    if request.order_type == OrderType::Sell {
        let held = state.position(side).quantity;
        if request.quantity > held {
            return Err(ExchangeError::InsufficientPosition {
                side,
                requested: request.quantity,
                held,
            });
        }
    }

    let opposite = side.opposite();
    let target_price = complement(limit_price);

    let mut remaining: Quantity = request.quantity;
    let mut executed: Quantity = 0;
    let mut executed_cost = ZERO;
    let mut realized_total = ZERO;

    while remaining > 0 {
        let Some(level) = state.book.best_match(opposite, target_price) else {
            break;
        };
        let key = level.key();
        let fill_quantity = remaining.min(level.quantity);
        let fill_price = complement(level.price);

        let realized = apply_fill(state, request.order_type, side, fill_quantity, fill_price)?;
        executed += fill_quantity;
        executed_cost += notional(fill_price, fill_quantity);
        realized_total += realized;
        remaining -= fill_quantity;

        state.book.consume(opposite, key, fill_quantity);
        state.market.quote_from_fill(side, fill_price, now);

        debug!(
            market_id = %market_id,
            side = %side,
            order_type = %request.order_type,
            price = %fill_price,
            quantity = fill_quantity,
            "Matched resting level"
        );
    }

    let mut resting: Quantity = 0;
    if remaining > 0 {
        match request.order_type {
            OrderType::Buy => {
                // Backstop: the remainder fills at the buyer's own limit.
                state.position_mut(side).apply_buy(limit_price, remaining);
                executed += remaining;
                executed_cost += notional(limit_price, remaining);
                state.market.quote_from_fill(side, limit_price, now);
                debug!(
                    market_id = %market_id,
                    side = %side,
                    price = %limit_price,
                    quantity = remaining,
                    "Backstop filled buy remainder"
                );
            }
            OrderType::Sell => {
                resting = remaining;
                state.book.insert(side, limit_price, resting, now);
                debug!(
                    market_id = %market_id,
                    side = %side,
                    price = %limit_price,
                    quantity = resting,
                    "Sell remainder resting on book"
                );
            }
        }
    }

    let price = if executed == 0 {
        limit_price
    } else {
        state.position_mut(side).updated_at = now;
        quantize(executed_cost / Decimal::from(executed))
    };

    let order = Order {
        id: OrderId::new(),
        market_id,
        side,
        order_type: request.order_type,
        price,
        quantity: executed,
        resting_quantity: resting,
        requested_quantity: request.quantity,
        total_cost: quantize(executed_cost),
        realized_pnl: quantize(realized_total),
        created_at: now,
    };
    state.record(order.clone());
    Ok(order)
}

fn apply_fill(
    state: &mut MarketState,
    order_type: OrderType,
    side: Side,
    quantity: Quantity,
    price: Price,
) -> Result<Money, ExchangeError> {
    let position = state.position_mut(side);
    match order_type {
        OrderType::Buy => Ok(position.apply_buy(price, quantity)),
        OrderType::Sell => position.apply_sell(price, quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Market, MarketId};
    use crate::engine::resolve;
    use rust_decimal_macros::dec;

    fn state_at(yes_price: Price) -> MarketState {
        let now = Utc::now();
        let market = Market::open(
            MarketId::new(),
            "test-market",
            "Test market?",
            None,
            yes_price,
            now,
        )
        .unwrap();
        MarketState::new(market, now)
    }

    #[test]
    fn buy_with_empty_book_backstops_at_limit() {
        let mut state = state_at(dec!(60.00));

        let order = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(60.00), 10), Utc::now())
            .unwrap();

        assert_eq!(order.quantity, 10);
        assert_eq!(order.resting_quantity, 0);
        assert_eq!(order.price, dec!(60.00));
        assert_eq!(order.total_cost, dec!(600.00));
        assert_eq!(state.position(Side::Yes).quantity, 10);
        assert_eq!(state.position(Side::Yes).average_price, dec!(60.00));
        assert!(state.book.is_empty());
        assert_eq!(state.journal().len(), 1);
    }

    #[test]
    fn backstop_requotes_market_at_limit() {
        let mut state = state_at(dec!(50.00));

        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(35.00), 1), Utc::now()).unwrap();

        assert_eq!(state.market.no_price, dec!(35.00));
        assert_eq!(state.market.yes_price, dec!(65.00));
    }

    #[test]
    fn unmatched_sell_rests_without_executing() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(50.00), 5), Utc::now()).unwrap();

        let order = place_order(&mut state, &OrderRequest::sell(Side::No, dec!(40.00), 5), Utc::now())
            .unwrap();

        assert_eq!(order.quantity, 0);
        assert_eq!(order.resting_quantity, 5);
        assert_eq!(order.price, dec!(40.00));
        assert_eq!(order.total_cost, dec!(0.00));
        // Resting does not reduce the holding.
        assert_eq!(state.position(Side::No).quantity, 5);
        let level = state.book.best_match(Side::No, dec!(0)).unwrap();
        assert_eq!((level.price, level.quantity), (dec!(40.00), 5));
        assert_eq!(state.market.yes_price, dec!(50.00));
    }

    #[test]
    fn buy_matches_opposite_level_at_complement_price() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(50.00), 5), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::sell(Side::No, dec!(40.00), 5), Utc::now()).unwrap();

        let order = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(72.00), 5), Utc::now())
            .unwrap();

        assert_eq!(order.quantity, 5);
        assert_eq!(order.price, dec!(60.00));
        assert_eq!(order.resting_quantity, 0);
        assert_eq!(state.market.yes_price, dec!(60.00));
        assert_eq!(state.market.no_price, dec!(40.00));
        assert!(state.book.is_empty());
        assert_eq!(state.position(Side::Yes).average_price, dec!(60.00));
    }

    #[test]
    fn buy_walks_levels_cheapest_first_then_backstops() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(50.00), 10), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::sell(Side::No, dec!(45.00), 3), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::sell(Side::No, dec!(40.00), 2), Utc::now()).unwrap();

        // Target is complement(70) = 30: both levels qualify.
        let order = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(70.00), 8), Utc::now())
            .unwrap();

        // 2 @ 60 + 3 @ 55 + 3 @ 70 (backstop) = 120 + 165 + 210 = 495
        assert_eq!(order.quantity, 8);
        assert_eq!(order.total_cost, dec!(495.00));
        assert_eq!(order.price, dec!(61.88));
        assert!(state.book.is_empty());
        assert_eq!(state.market.yes_price, dec!(70.00));
        assert_eq!(state.market.no_price, dec!(30.00));
    }

    #[test]
    fn levels_below_target_are_not_matched() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(50.00), 5), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::sell(Side::No, dec!(20.00), 5), Utc::now()).unwrap();

        // Target is complement(60) = 40 > 20.
        let order = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(60.00), 1), Utc::now())
            .unwrap();

        assert_eq!(order.price, dec!(60.00));
        assert_eq!(state.book.depth(Side::No), 5);
    }

    #[test]
    fn sell_matches_resting_opposite_sell_and_realizes_pnl() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(40.00), 10), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::buy(Side::No, dec!(50.00), 4), Utc::now()).unwrap();
        place_order(&mut state, &OrderRequest::sell(Side::No, dec!(45.00), 4), Utc::now()).unwrap();

        // SELL YES @ 50: target 50, NO level at 45 does not qualify.
        let rests = place_order(&mut state, &OrderRequest::sell(Side::Yes, dec!(50.00), 2), Utc::now())
            .unwrap();
        assert_eq!(rests.resting_quantity, 2);

        // SELL YES @ 55: target 45, NO level at 45 matches at 55.
        let order = place_order(&mut state, &OrderRequest::sell(Side::Yes, dec!(55.00), 4), Utc::now())
            .unwrap();

        assert_eq!(order.quantity, 4);
        assert_eq!(order.price, dec!(55.00));
        assert_eq!(order.realized_pnl, dec!(60.00));
        assert_eq!(state.position(Side::Yes).quantity, 6);
        assert_eq!(state.position(Side::Yes).average_price, dec!(40.00));
    }

    #[test]
    fn oversized_sell_is_rejected_untouched() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(55.00), 5), Utc::now()).unwrap();
        let before = state.clone();

        let err = place_order(&mut state, &OrderRequest::sell(Side::Yes, dec!(50.00), 10), Utc::now())
            .unwrap_err();

        assert!(matches!(err, ExchangeError::InsufficientPosition { held: 5, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn out_of_range_price_is_rejected() {
        let mut state = state_at(dec!(50.00));
        for price in [dec!(100.01), dec!(-0.01), dec!(250), dec!(100.004), dec!(-0.004)] {
            let err = place_order(&mut state, &OrderRequest::buy(Side::Yes, price, 1), Utc::now())
                .unwrap_err();
            assert!(matches!(err, ExchangeError::InvalidPrice { .. }));
        }
        assert!(state.journal().is_empty());
        assert_eq!(state.position(Side::Yes).quantity, 0);
        assert_eq!(state.market.yes_price, dec!(50.00));
    }

    // A zero limit is legal and backstops at zero, so the lot carries a zero
    // basis while held. The basis check flags exactly that case.
    #[test]
    fn buy_at_zero_holds_contracts_with_zero_basis() {
        let mut state = state_at(dec!(50.00));

        let order = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(0), 3), Utc::now())
            .unwrap();

        assert_eq!(order.quantity, 3);
        assert_eq!(order.total_cost, dec!(0.00));
        let position = state.position(Side::Yes);
        assert_eq!(position.quantity, 3);
        assert!(position.average_price.is_zero());
        assert!(!position.basis_is_consistent());
        assert!(!state.is_consistent());
        assert_eq!(state.market.yes_price, dec!(0.00));
        assert_eq!(state.market.no_price, dec!(100.00));
    }

    #[test]
    fn buy_at_hundred_is_accepted() {
        let mut state = state_at(dec!(50.00));

        let order = place_order(&mut state, &OrderRequest::buy(Side::No, dec!(100), 2), Utc::now())
            .unwrap();

        assert_eq!(order.price, dec!(100.00));
        assert_eq!(state.position(Side::No).average_price, dec!(100.00));
        assert!(state.is_consistent());
    }

    #[test]
    fn orders_on_resolved_market_are_rejected() {
        let mut state = state_at(dec!(50.00));
        resolve(&mut state, Side::Yes, Utc::now()).unwrap();

        let err = place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(50.00), 1), Utc::now())
            .unwrap_err();

        assert_eq!(
            err,
            ExchangeError::MarketClosed {
                market_id: state.market.id
            }
        );
    }

    #[test]
    fn boundary_limit_prices_are_accepted() {
        let mut state = state_at(dec!(50.00));
        place_order(&mut state, &OrderRequest::buy(Side::Yes, dec!(100.00), 1), Utc::now()).unwrap();

        assert_eq!(state.market.yes_price, dec!(100.00));
        assert_eq!(state.market.no_price, dec!(0.00));
        assert!(state.market.prices_are_complementary());
    }
}
