//! Database row types and their mapping to domain values.
//!
//! Decimals are stored as text so no precision is lost, timestamps as
//! fixed-width RFC 3339 text so they sort lexically, and enums as their
//! upper-case labels. This module is the only place that mapping lives.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{markets, order_book_levels, orders, positions, resolutions};
use crate::domain::{
    Market, MarketId, Order, OrderBookLevel, Position, Quantity, Resolution,
};
use crate::error::{Error, Result};

/// Database row for a market.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = markets)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarketRow {
    pub id: String,
    pub slug: String,
    pub question: String,
    pub description: Option<String>,
    pub status: String,
    pub outcome: Option<String>,
    pub yes_price: String,
    pub no_price: String,
    pub book_sequence: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a position.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionRow {
    pub market_id: String,
    pub side: String,
    pub quantity: i64,
    pub average_price: String,
    pub realized_pnl: String,
    pub updated_at: String,
}

/// Database row for a resting order book level.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = order_book_levels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LevelRow {
    pub id: String,
    pub market_id: String,
    pub side: String,
    pub price: String,
    pub quantity: i64,
    pub sequence: i64,
    pub created_at: String,
}

/// Database row for an order (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: String,
    pub market_id: String,
    pub side: String,
    pub order_type: String,
    pub price: String,
    pub quantity: i64,
    pub resting_quantity: i64,
    pub requested_quantity: i64,
    pub total_cost: String,
    pub realized_pnl: String,
    pub created_at: String,
}

/// Database row for an order (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub seq: i64,
    pub id: String,
    pub market_id: String,
    pub side: String,
    pub order_type: String,
    pub price: String,
    pub quantity: i64,
    pub resting_quantity: i64,
    pub requested_quantity: i64,
    pub total_cost: String,
    pub realized_pnl: String,
    pub created_at: String,
}

/// Database row for a resolution.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = resolutions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ResolutionRow {
    pub id: String,
    pub market_id: String,
    pub outcome: String,
    pub payout_yes: String,
    pub payout_no: String,
    pub created_at: String,
}

pub(crate) fn format_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| Error::Parse(e.to_string()))
}

fn parse<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| Error::Parse(e.to_string()))
}

pub(crate) fn to_i64(quantity: Quantity) -> Result<i64> {
    i64::try_from(quantity).map_err(|e| Error::Parse(e.to_string()))
}

fn to_quantity(value: i64) -> Result<Quantity> {
    Quantity::try_from(value).map_err(|e| Error::Parse(e.to_string()))
}

impl MarketRow {
    pub fn from_market(market: &Market, book_sequence: u64) -> Result<Self> {
        Ok(Self {
            id: market.id.to_string(),
            slug: market.slug.clone(),
            question: market.question.clone(),
            description: market.description.clone(),
            status: market.status.as_str().to_string(),
            outcome: market.outcome.map(|o| o.as_str().to_string()),
            yes_price: market.yes_price.to_string(),
            no_price: market.no_price.to_string(),
            book_sequence: to_i64(book_sequence)?,
            created_at: format_time(&market.created_at),
            updated_at: format_time(&market.updated_at),
        })
    }

    /// The market and the next book sequence number.
    pub fn into_market(self) -> Result<(Market, u64)> {
        let market = Market {
            id: parse(&self.id)?,
            slug: self.slug,
            question: self.question,
            description: self.description,
            status: parse(&self.status)?,
            outcome: self.outcome.as_deref().map(parse).transpose()?,
            yes_price: parse_decimal(&self.yes_price)?,
            no_price: parse_decimal(&self.no_price)?,
            created_at: parse_time(&self.created_at)?,
            updated_at: parse_time(&self.updated_at)?,
        };
        Ok((market, to_quantity(self.book_sequence)?))
    }
}

impl PositionRow {
    pub fn from_position(position: &Position) -> Result<Self> {
        Ok(Self {
            market_id: position.market_id.to_string(),
            side: position.side.as_str().to_string(),
            quantity: to_i64(position.quantity)?,
            average_price: position.average_price.to_string(),
            realized_pnl: position.realized_pnl.to_string(),
            updated_at: format_time(&position.updated_at),
        })
    }

    pub fn into_position(self) -> Result<Position> {
        Ok(Position {
            market_id: parse(&self.market_id)?,
            side: parse(&self.side)?,
            quantity: to_quantity(self.quantity)?,
            average_price: parse_decimal(&self.average_price)?,
            realized_pnl: parse_decimal(&self.realized_pnl)?,
            updated_at: parse_time(&self.updated_at)?,
        })
    }
}

impl LevelRow {
    pub fn from_level(level: &OrderBookLevel) -> Result<Self> {
        Ok(Self {
            id: level.id.to_string(),
            market_id: level.market_id.to_string(),
            side: level.side.as_str().to_string(),
            price: level.price.to_string(),
            quantity: to_i64(level.quantity)?,
            sequence: to_i64(level.sequence)?,
            created_at: format_time(&level.created_at),
        })
    }

    pub fn into_level(self) -> Result<OrderBookLevel> {
        Ok(OrderBookLevel {
            id: parse(&self.id)?,
            market_id: parse(&self.market_id)?,
            side: parse(&self.side)?,
            price: parse_decimal(&self.price)?,
            quantity: to_quantity(self.quantity)?,
            sequence: to_quantity(self.sequence)?,
            created_at: parse_time(&self.created_at)?,
        })
    }
}

impl NewOrderRow {
    pub fn from_order(order: &Order) -> Result<Self> {
        Ok(Self {
            id: order.id.to_string(),
            market_id: order.market_id.to_string(),
            side: order.side.as_str().to_string(),
            order_type: order.order_type.as_str().to_string(),
            price: order.price.to_string(),
            quantity: to_i64(order.quantity)?,
            resting_quantity: to_i64(order.resting_quantity)?,
            requested_quantity: to_i64(order.requested_quantity)?,
            total_cost: order.total_cost.to_string(),
            realized_pnl: order.realized_pnl.to_string(),
            created_at: format_time(&order.created_at),
        })
    }
}

impl OrderRow {
    pub fn into_order(self) -> Result<Order> {
        Ok(Order {
            id: parse(&self.id)?,
            market_id: parse(&self.market_id)?,
            side: parse(&self.side)?,
            order_type: parse(&self.order_type)?,
            price: parse_decimal(&self.price)?,
            quantity: to_quantity(self.quantity)?,
            resting_quantity: to_quantity(self.resting_quantity)?,
            requested_quantity: to_quantity(self.requested_quantity)?,
            total_cost: parse_decimal(&self.total_cost)?,
            realized_pnl: parse_decimal(&self.realized_pnl)?,
            created_at: parse_time(&self.created_at)?,
        })
    }
}

impl ResolutionRow {
    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self {
            id: resolution.id.to_string(),
            market_id: resolution.market_id.to_string(),
            outcome: resolution.outcome.as_str().to_string(),
            payout_yes: resolution.payout_yes.to_string(),
            payout_no: resolution.payout_no.to_string(),
            created_at: format_time(&resolution.created_at),
        }
    }

    pub fn into_resolution(self) -> Result<Resolution> {
        Ok(Resolution {
            id: parse(&self.id)?,
            market_id: parse(&self.market_id)?,
            outcome: parse(&self.outcome)?,
            payout_yes: parse_decimal(&self.payout_yes)?,
            payout_no: parse_decimal(&self.payout_no)?,
            created_at: parse_time(&self.created_at)?,
        })
    }
}

/// Key used to look up a market's rows.
pub(crate) fn market_key(id: &MarketId) -> String {
    id.to_string()
}
