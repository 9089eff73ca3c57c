//! One-time settlement record of a market.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::{MarketId, Outcome, ResolutionId};

/// Outcome and per-side payout totals, written once when a market resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: ResolutionId,
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub payout_yes: Money,
    pub payout_no: Money,
    pub created_at: DateTime<Utc>,
}
