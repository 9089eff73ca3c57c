//! Handlers for `predicta market`.

use serde_json::json;
use tabled::Tabled;

use super::ledger::PositionRow;
use super::output;
use crate::domain::{Market, MarketId, Outcome};
use crate::error::Result;
use crate::service::{Exchange, NewMarket};
use crate::store::MarketStore;

#[derive(Tabled)]
struct MarketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "YES")]
    yes_price: String,
    #[tabled(rename = "NO")]
    no_price: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

impl From<&Market> for MarketRow {
    fn from(market: &Market) -> Self {
        Self {
            id: market.id.to_string(),
            slug: market.slug.clone(),
            status: market.status.to_string(),
            yes_price: market.yes_price.to_string(),
            no_price: market.no_price.to_string(),
            outcome: market.outcome.map_or_else(|| "-".into(), |o| o.to_string()),
        }
    }
}

fn print_market(market: &Market) {
    output::field("ID", market.id);
    output::field("Slug", &market.slug);
    output::field("Question", &market.question);
    if let Some(description) = &market.description {
        output::field("Description", description);
    }
    output::field("Status", market.status);
    output::field("YES", market.yes_price);
    output::field("NO", market.no_price);
    if let Some(outcome) = market.outcome {
        output::field("Outcome", outcome);
    }
}

/// Execute `market create`.
pub fn create<S: MarketStore>(exchange: &Exchange<S>, request: &NewMarket) -> Result<()> {
    let market = exchange.create_market(request)?;
    if output::is_json() {
        return output::json(&market);
    }
    output::success(&format!("Created market {}", market.slug));
    print_market(&market);
    Ok(())
}

/// Execute `market list`.
pub fn list<S: MarketStore>(exchange: &Exchange<S>) -> Result<()> {
    let markets = exchange.list_markets()?;
    if output::is_json() {
        return output::json(&markets);
    }
    let rows = markets.iter().map(MarketRow::from).collect();
    output::table::<MarketRow>(rows, "No markets yet");
    Ok(())
}

/// Execute `market show`.
pub fn show<S: MarketStore>(exchange: &Exchange<S>, market_id: &MarketId) -> Result<()> {
    let market = exchange.get_market(market_id)?;
    let positions = exchange.list_positions(market_id)?;
    let resolution = exchange.get_resolution(market_id)?;

    if output::is_json() {
        return output::json(&json!({
            "market": market,
            "positions": positions,
            "resolution": resolution,
        }));
    }

    print_market(&market);
    output::section("Positions");
    output::table(positions.iter().map(PositionRow::from).collect(), "No positions");
    if let Some(resolution) = resolution {
        output::section("Resolution");
        output::field("Outcome", resolution.outcome);
        output::field("Payout YES", resolution.payout_yes);
        output::field("Payout NO", resolution.payout_no);
    }
    Ok(())
}

/// Execute `market resolve`.
pub fn resolve<S: MarketStore>(
    exchange: &Exchange<S>,
    market_id: &MarketId,
    outcome: Outcome,
) -> Result<()> {
    let market = exchange.resolve_market(market_id, outcome)?;
    let resolution = exchange.get_resolution(market_id)?;

    if output::is_json() {
        return output::json(&json!({
            "market": market,
            "resolution": resolution,
        }));
    }

    output::success(&format!("Resolved {} as {outcome}", market.slug));
    if let Some(resolution) = resolution {
        output::field("Payout YES", resolution.payout_yes);
        output::field("Payout NO", resolution.payout_no);
    }
    Ok(())
}
