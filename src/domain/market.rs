//! Binary market with complementary YES/NO pricing.
//!
//! A [`Market`] is created OPEN with `yes_price + no_price == 100.00` and
//! moves to RESOLVED exactly once. While open, its quoted prices follow the
//! most recent fill on either side.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{complement, quantize, Price, HUNDRED};
use super::side::ParseLabelError;
use super::{MarketId, Outcome, Side};
use crate::error::ExchangeError;

/// Lifecycle state of a market. RESOLVED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketStatus {
    Open,
    Resolved,
}

impl MarketStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "RESOLVED" => Ok(Self::Resolved),
            _ => Err(ParseLabelError::new("market status", s)),
        }
    }
}

/// A binary prediction market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub slug: String,
    pub question: String,
    pub description: Option<String>,
    pub status: MarketStatus,
    pub outcome: Option<Outcome>,
    pub yes_price: Price,
    pub no_price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Market {
    /// Open a new market quoted at `initial_yes_price`.
    ///
    /// The price is quantized to the cent first and must then lie strictly
    /// between 0 and 100; the NO price is its complement.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidPrice`] for an out-of-range price.
    pub fn open(
        id: MarketId,
        slug: impl Into<String>,
        question: impl Into<String>,
        description: Option<String>,
        initial_yes_price: Price,
        now: DateTime<Utc>,
    ) -> Result<Self, ExchangeError> {
        let yes_price = quantize(initial_yes_price);
        if yes_price <= Price::ZERO || yes_price >= HUNDRED {
            return Err(ExchangeError::InvalidPrice {
                price: initial_yes_price,
                reason: "initial YES price must be strictly between 0 and 100",
            });
        }

        Ok(Self {
            id,
            slug: slug.into(),
            question: question.into(),
            description,
            status: MarketStatus::Open,
            outcome: None,
            yes_price,
            no_price: complement(yes_price),
            created_at: now,
            updated_at: now,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Quoted price of one side.
    #[must_use]
    pub const fn price(&self, side: Side) -> Price {
        match side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }

    /// Re-quote the market from a fill at `price` on `side`.
    pub fn quote_from_fill(&mut self, side: Side, price: Price, now: DateTime<Utc>) {
        let price = quantize(price);
        match side {
            Side::Yes => {
                self.yes_price = price;
                self.no_price = complement(price);
            }
            Side::No => {
                self.no_price = price;
                self.yes_price = complement(price);
            }
        }
        self.updated_at = now;
    }

    /// Flip to RESOLVED with `outcome`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::AlreadyResolved`] if the market is not open.
    pub fn resolve(&mut self, outcome: Outcome, now: DateTime<Utc>) -> Result<(), ExchangeError> {
        if !self.is_open() {
            return Err(ExchangeError::AlreadyResolved { market_id: self.id });
        }
        self.status = MarketStatus::Resolved;
        self.outcome = Some(outcome);
        self.updated_at = now;
        Ok(())
    }

    /// The pricing invariant: both quotes sum to exactly 100.
    #[must_use]
    pub fn prices_are_complementary(&self) -> bool {
        self.yes_price + self.no_price == HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_at(price: Price) -> Result<Market, ExchangeError> {
        Market::open(
            MarketId::new(),
            "will-it-rain",
            "Will it rain tomorrow?",
            None,
            price,
            Utc::now(),
        )
    }

    #[test]
    fn open_sets_complementary_prices() {
        let market = open_at(dec!(60)).unwrap();

        assert_eq!(market.yes_price, dec!(60.00));
        assert_eq!(market.no_price, dec!(40.00));
        assert_eq!(market.status, MarketStatus::Open);
        assert!(market.outcome.is_none());
        assert!(market.prices_are_complementary());
    }

    #[test]
    fn open_quantizes_before_range_check() {
        let market = open_at(dec!(33.335)).unwrap();
        assert_eq!(market.yes_price, dec!(33.34));
        assert_eq!(market.no_price, dec!(66.66));

        assert!(open_at(dec!(0.004)).is_err());
        assert!(open_at(dec!(99.995)).is_err());
    }

    #[test]
    fn open_rejects_boundary_prices() {
        for price in [dec!(0), dec!(100), dec!(-5), dec!(150)] {
            assert!(matches!(
                open_at(price),
                Err(ExchangeError::InvalidPrice { .. })
            ));
        }
    }

    #[test]
    fn fill_on_no_side_requotes_yes_as_complement() {
        let mut market = open_at(dec!(50)).unwrap();
        market.quote_from_fill(Side::No, dec!(35.00), Utc::now());

        assert_eq!(market.no_price, dec!(35.00));
        assert_eq!(market.yes_price, dec!(65.00));
        assert_eq!(market.price(Side::Yes), dec!(65.00));
    }

    #[test]
    fn resolve_is_one_way() {
        let mut market = open_at(dec!(50)).unwrap();
        market.resolve(Side::Yes, Utc::now()).unwrap();

        assert_eq!(market.status, MarketStatus::Resolved);
        assert_eq!(market.outcome, Some(Side::Yes));
        assert_eq!(
            market.resolve(Side::No, Utc::now()),
            Err(ExchangeError::AlreadyResolved {
                market_id: market.id
            })
        );
        assert_eq!(market.outcome, Some(Side::Yes));
    }
}
