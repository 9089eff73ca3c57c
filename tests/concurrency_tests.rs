//! Same-market operations serialize; different markets run side by side.

mod support;

use std::thread;

use predicta::domain::{OrderRequest, Side};
use predicta::service::Exchange;
use predicta::store::MarketStore;
use predicta::testkit::exchange::{even_market, memory_exchange, open_market};
use rust_decimal_macros::dec;
use support::db::TempDb;

/// Many buyers race for one resting level; it must be consumed exactly once.
fn resting_level_is_taken_once<S: MarketStore>(exchange: &Exchange<S>, buyers: usize) {
    let market = even_market(exchange);
    exchange
        .place_order(&market.id, &OrderRequest::buy(Side::No, dec!(50), 10))
        .unwrap();
    exchange
        .place_order(&market.id, &OrderRequest::sell(Side::No, dec!(40), 10))
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..buyers {
            scope.spawn(|| {
                exchange
                    .place_order(&market.id, &OrderRequest::buy(Side::Yes, dec!(99), 1))
                    .unwrap();
            });
        }
    });

    assert!(exchange.list_order_book(&market.id).unwrap().is_empty());

    let orders = exchange.list_orders(&market.id).unwrap();
    let buys: Vec<_> = orders.iter().filter(|o| o.side == Side::Yes).collect();
    assert_eq!(buys.len(), buyers);
    let matched = buys.iter().filter(|o| o.price == dec!(60.00)).count();
    let backstopped = buys.iter().filter(|o| o.price == dec!(99.00)).count();
    assert_eq!(matched, 10);
    assert_eq!(backstopped, buyers - 10);

    let yes = exchange
        .list_positions(&market.id)
        .unwrap()
        .into_iter()
        .find(|p| p.side == Side::Yes)
        .unwrap();
    assert_eq!(yes.quantity, buyers as u64);
}

#[test]
fn memory_store_serializes_same_market() {
    resting_level_is_taken_once(&memory_exchange(), 32);
}

#[test]
fn sqlite_store_serializes_same_market() {
    let db = TempDb::new();
    resting_level_is_taken_once(&db.exchange(), 16);
}

#[test]
fn different_markets_trade_independently() {
    let exchange = memory_exchange();
    let markets: Vec<_> = (0..8)
        .map(|i| open_market(&exchange, &format!("Will team {i} win the cup?"), dec!(50)))
        .collect();

    thread::scope(|scope| {
        for market in &markets {
            let exchange = &exchange;
            scope.spawn(move || {
                for _ in 0..25 {
                    exchange
                        .place_order(&market.id, &OrderRequest::buy(Side::Yes, dec!(50), 2))
                        .unwrap();
                }
            });
        }
    });

    for market in &markets {
        let positions = exchange.list_positions(&market.id).unwrap();
        assert_eq!(positions[1].side, Side::Yes);
        assert_eq!(positions[1].quantity, 50);
        assert_eq!(positions[1].average_price, dec!(50.00));
        assert_eq!(exchange.list_orders(&market.id).unwrap().len(), 25);
    }
}

#[test]
fn concurrent_resolutions_settle_once() {
    let exchange = memory_exchange();
    let market = even_market(&exchange);
    exchange
        .place_order(&market.id, &OrderRequest::buy(Side::Yes, dec!(50), 4))
        .unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| exchange.resolve_market(&market.id, Side::Yes)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let positions = exchange.list_positions(&market.id).unwrap();
    assert_eq!(positions[1].realized_pnl, dec!(200.00));
}
