//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::{MarketId, OrderType, Outcome, Quantity, Side};

/// Binary prediction market exchange
#[derive(Parser, Debug)]
#[command(name = "predicta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, inspect and resolve markets
    #[command(subcommand)]
    Market(MarketCommand),

    /// Place and list orders
    #[command(subcommand)]
    Order(OrderCommand),

    /// Show both positions of a market
    Positions(MarketArg),

    /// Show resting order book levels of a market
    Book(MarketArg),
}

/// Subcommands for `predicta market`
#[derive(Subcommand, Debug)]
pub enum MarketCommand {
    /// Open a new market
    Create(CreateMarketArgs),
    /// List markets, newest first
    List,
    /// Show a market with its positions and resolution
    Show(MarketArg),
    /// Resolve a market and settle every position
    Resolve(ResolveArgs),
}

/// Subcommands for `predicta order`
#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Place a limit order
    Place(PlaceOrderArgs),
    /// List executed orders of a market, oldest first
    List(MarketArg),
}

/// Shared argument for commands that only need a market.
#[derive(Parser, Debug)]
pub struct MarketArg {
    /// Market ID
    pub market_id: MarketId,
}

/// Arguments for `market create`.
#[derive(Parser, Debug)]
pub struct CreateMarketArgs {
    /// Question the market resolves on
    #[arg(long)]
    pub question: String,

    /// Longer description of the resolution criteria
    #[arg(long)]
    pub description: Option<String>,

    /// Explicit slug (generated from the question if omitted)
    #[arg(long)]
    pub slug: Option<String>,

    /// Initial YES price, strictly between 0 and 100
    #[arg(long, allow_negative_numbers = true)]
    pub yes_price: Decimal,
}

/// Arguments for `market resolve`.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Market ID
    pub market_id: MarketId,

    /// Winning side (yes, no)
    #[arg(long)]
    pub outcome: Outcome,
}

/// Arguments for `order place`.
#[derive(Parser, Debug)]
pub struct PlaceOrderArgs {
    /// Market ID
    pub market_id: MarketId,

    /// Side to trade (yes, no)
    #[arg(long)]
    pub side: Side,

    /// Order direction (buy, sell)
    #[arg(long = "type")]
    pub order_type: OrderType,

    /// Limit price between 0 and 100
    #[arg(long, allow_negative_numbers = true)]
    pub price: Decimal,

    /// Number of contracts
    #[arg(long)]
    pub quantity: Quantity,
}
