use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{MarketId, Quantity, Side};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Expected, user-facing failures of exchange operations.
///
/// Every variant means the operation was rejected as a whole and no state
/// was changed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid price {price}: {reason}")]
    InvalidPrice { price: Decimal, reason: &'static str },

    #[error("invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: Quantity, reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("insufficient {side} position: requested {requested}, held {held}")]
    InsufficientPosition {
        side: Side,
        requested: Quantity,
        held: Quantity,
    },

    #[error("market {market_id} is resolved")]
    MarketClosed { market_id: MarketId },

    #[error("market {market_id} is already resolved")]
    AlreadyResolved { market_id: MarketId },

    #[error("slug already in use: {slug}")]
    SlugConflict { slug: String },
}

impl ExchangeError {
    pub(crate) fn market_not_found(market_id: &MarketId) -> Self {
        Self::NotFound {
            entity: "market",
            id: market_id.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The exchange error behind this failure, if it was one.
    #[must_use]
    pub fn as_exchange(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(err) => Some(err),
            _ => None,
        }
    }
}

// Lets diesel transaction closures propagate with `?`.
impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exchange_error_messages_name_the_problem() {
        let err = ExchangeError::InsufficientPosition {
            side: Side::Yes,
            requested: 10,
            held: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient YES position: requested 10, held 5"
        );

        let err = ExchangeError::InvalidPrice {
            price: dec!(101.00),
            reason: "must be between 0 and 100",
        };
        assert!(err.to_string().contains("101.00"));
    }

    #[test]
    fn exchange_error_converts_into_top_level() {
        let err: Error = ExchangeError::SlugConflict {
            slug: "taken".into(),
        }
        .into();
        assert!(matches!(
            err.as_exchange(),
            Some(ExchangeError::SlugConflict { .. })
        ));
    }

    #[test]
    fn config_error_is_not_an_exchange_error() {
        let err: Error = ConfigError::MissingField { field: "url" }.into();
        assert!(err.as_exchange().is_none());
    }
}
