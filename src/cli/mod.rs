//! The `predicta` command-line adapter.
//!
//! Each subcommand is a thin translation onto one [`Exchange`] call against
//! the configured SQLite database.

pub mod command;
mod ledger;
mod market;
mod order;
pub mod output;

use tracing::debug;

use self::command::{Cli, Commands, MarketCommand, OrderCommand};
use crate::config::Config;
use crate::domain::OrderRequest;
use crate::error::Result;
use crate::service::{Exchange, NewMarket};
use crate::store::SqliteStore;

/// Open the configured store and execute the parsed command.
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    debug!(database = %config.database.url, "Opening store");
    let store = SqliteStore::open(&config.database.url)?;
    let exchange = Exchange::new(store, config.settings());

    match cli.command {
        Commands::Market(command) => match command {
            MarketCommand::Create(args) => {
                let request = NewMarket {
                    question: args.question,
                    description: args.description,
                    slug: args.slug,
                    initial_yes_price: args.yes_price,
                };
                market::create(&exchange, &request)
            }
            MarketCommand::List => market::list(&exchange),
            MarketCommand::Show(args) => market::show(&exchange, &args.market_id),
            MarketCommand::Resolve(args) => {
                market::resolve(&exchange, &args.market_id, args.outcome)
            }
        },
        Commands::Order(command) => match command {
            OrderCommand::Place(args) => {
                let request = OrderRequest {
                    side: args.side,
                    order_type: args.order_type,
                    price: args.price,
                    quantity: args.quantity,
                };
                order::place(&exchange, &args.market_id, &request)
            }
            OrderCommand::List(args) => order::list(&exchange, &args.market_id),
        },
        Commands::Positions(args) => ledger::positions(&exchange, &args.market_id),
        Commands::Book(args) => ledger::book(&exchange, &args.market_id),
    }
}
