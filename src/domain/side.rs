//! The closed enums of a binary market: which instrument, and which direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two complementary instruments of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

/// The outcome a market resolves to names the winning side.
pub type Outcome = Side;

impl Side {
    /// Both sides, YES first.
    pub const ALL: [Side; 2] = [Side::Yes, Side::No];

    /// The complementary instrument.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Upper-case label used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Yes => 0,
            Self::No => 1,
        }
    }
}

// Listings sort by label, so NO comes before YES.
impl Ord for Side {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Side {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            _ => Err(ParseLabelError::new("side", s)),
        }
    }
}

/// Direction of an incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ParseLabelError::new("order type", s)),
        }
    }
}

/// A stored or user-supplied label did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn sides_order_by_label() {
        let mut sides = vec![Side::Yes, Side::No];
        sides.sort();
        assert_eq!(sides, vec![Side::No, Side::Yes]);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("yes".parse::<Side>().unwrap(), Side::Yes);
        assert_eq!(" NO ".parse::<Side>().unwrap(), Side::No);
        assert_eq!("Sell".parse::<OrderType>().unwrap(), OrderType::Sell);
        assert!("maybe".parse::<Side>().is_err());
    }

    #[test]
    fn serde_uses_upper_case_labels() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"YES\"");
        assert_eq!(serde_json::to_string(&OrderType::Buy).unwrap(), "\"BUY\"");
    }
}
