//! The exchange service: validated entry points over a [`MarketStore`].
//!
//! [`Exchange`] is what transports (the CLI, tests, an eventual HTTP layer)
//! talk to. It checks requests, assigns slugs, and runs every mutation as a
//! single [`MarketStore::transact`] unit so concurrent callers on the same
//! market are linearized.

pub mod slug;
mod validation;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    Market, MarketId, Order, OrderBookLevel, OrderRequest, Outcome, Position, Price, Resolution,
};
use crate::engine;
use crate::error::{ExchangeError, Result};
use crate::store::MarketStore;

/// Request limits enforced by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeSettings {
    pub max_order_quantity: u64,
    pub slug_max_attempts: u32,
    pub min_question_len: usize,
    pub max_question_len: usize,
    pub max_description_len: usize,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            max_order_quantity: 1_000_000,
            slug_max_attempts: 1_000,
            min_question_len: 4,
            max_question_len: 255,
            max_description_len: 2_000,
        }
    }
}

/// A request to open a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMarket {
    pub question: String,
    pub description: Option<String>,
    /// Explicit slug; generated from the question when absent.
    pub slug: Option<String>,
    pub initial_yes_price: Price,
}

impl NewMarket {
    #[must_use]
    pub fn new(question: impl Into<String>, initial_yes_price: Price) -> Self {
        Self {
            question: question.into(),
            description: None,
            slug: None,
            initial_yes_price,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Prediction market exchange over a store.
///
/// `Exchange` is `Send + Sync` whenever the store is; share it with `Arc`.
#[derive(Debug)]
pub struct Exchange<S> {
    store: S,
    settings: ExchangeSettings,
}

impl<S: MarketStore> Exchange<S> {
    #[must_use]
    pub fn new(store: S, settings: ExchangeSettings) -> Self {
        Self { store, settings }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Open a market with one flat position per side.
    ///
    /// A generated slug that loses a race to a concurrent creation is
    /// regenerated; an explicit slug that is taken fails with `SlugConflict`.
    pub fn create_market(&self, request: &NewMarket) -> Result<Market> {
        if let Err(err) = validation::check_new_market(&self.settings, request) {
            warn!(error = %err, "Rejected market creation");
            return Err(err.into());
        }

        let question = request.question.trim();
        let base = slug::slugify(question);

        let mut races = 0;
        loop {
            let slug = match &request.slug {
                Some(slug) => {
                    if self.store.slug_exists(slug)? {
                        warn!(slug = %slug, "Requested slug already in use");
                        return Err(ExchangeError::SlugConflict { slug: slug.clone() }.into());
                    }
                    slug.clone()
                }
                None => slug::unique_slug(&base, self.settings.slug_max_attempts, |candidate| {
                    self.store.slug_exists(candidate)
                })?,
            };

            let state = engine::create_market(
                &slug,
                question,
                request.description.as_deref(),
                request.initial_yes_price,
                Utc::now(),
            )?;

            match self.store.insert_market(state) {
                Ok(market) => {
                    info!(
                        market_id = %market.id,
                        slug = %market.slug,
                        yes_price = %market.yes_price,
                        "Market created"
                    );
                    return Ok(market);
                }
                Err(err)
                    if request.slug.is_none()
                        && races < self.settings.slug_max_attempts
                        && matches!(err.as_exchange(), Some(ExchangeError::SlugConflict { .. })) =>
                {
                    races += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Match an order against the market's book as one atomic unit.
    pub fn place_order(&self, market_id: &MarketId, request: &OrderRequest) -> Result<Order> {
        if let Err(err) = validation::check_order(&self.settings, request) {
            warn!(market_id = %market_id, error = %err, "Rejected order");
            return Err(err.into());
        }

        let result = self.store.transact(market_id, |state| {
            Ok(engine::place_order(state, request, Utc::now())?)
        });
        match &result {
            Ok(order) => info!(
                market_id = %market_id,
                order_id = %order.id,
                side = %order.side,
                order_type = %order.order_type,
                price = %order.price,
                quantity = order.quantity,
                resting = order.resting_quantity,
                "Order placed"
            ),
            Err(err) => warn!(market_id = %market_id, error = %err, "Order failed"),
        }
        result
    }

    /// Settle every position and close the market.
    pub fn resolve_market(&self, market_id: &MarketId, outcome: Outcome) -> Result<Market> {
        let result = self.store.transact(market_id, |state| {
            let resolution = engine::resolve(state, outcome, Utc::now())?;
            Ok((state.market.clone(), resolution))
        });
        match result {
            Ok((market, resolution)) => {
                info!(
                    market_id = %market_id,
                    outcome = %outcome,
                    payout_yes = %resolution.payout_yes,
                    payout_no = %resolution.payout_no,
                    "Market resolved"
                );
                Ok(market)
            }
            Err(err) => {
                warn!(market_id = %market_id, error = %err, "Resolution failed");
                Err(err)
            }
        }
    }

    /// Both positions of a market, NO before YES.
    pub fn list_positions(&self, market_id: &MarketId) -> Result<Vec<Position>> {
        Ok(self.store.load(market_id)?.positions())
    }

    /// Resting levels by side, then price ascending, then arrival.
    pub fn list_order_book(&self, market_id: &MarketId) -> Result<Vec<OrderBookLevel>> {
        let state = self.store.load(market_id)?;
        Ok(state.book.levels().cloned().collect())
    }

    pub fn list_markets(&self) -> Result<Vec<Market>> {
        self.store.list_markets()
    }

    pub fn get_market(&self, market_id: &MarketId) -> Result<Market> {
        self.store.get_market(market_id)
    }

    /// Execution history of a market, oldest first.
    pub fn list_orders(&self, market_id: &MarketId) -> Result<Vec<Order>> {
        self.store.list_orders(market_id)
    }

    pub fn get_resolution(&self, market_id: &MarketId) -> Result<Option<Resolution>> {
        Ok(self.store.load(market_id)?.resolution)
    }
}
