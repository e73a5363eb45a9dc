use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InstrumentKey;

/// Normalized best-price ticker for one instrument.
///
/// Every price is finite and non-negative. `high >= low` is expected from the
/// venue but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Instrument the ticker belongs to.
    pub key: InstrumentKey,
    /// Period high.
    pub high: Decimal,
    /// Period low.
    pub low: Decimal,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Period open.
    pub open: Decimal,
    /// Last/close price.
    pub close: Decimal,
    /// When the snapshot was observed.
    pub observed_at: DateTime<Utc>,
}

impl TickerSnapshot {
    /// Midpoint of bid and ask, if both sides are quoted.
    #[must_use]
    pub fn mid(&self) -> Option<Decimal> {
        if self.bid.is_zero() || self.ask.is_zero() {
            return None;
        }
        Some((self.bid + self.ask) / Decimal::TWO)
    }
}
