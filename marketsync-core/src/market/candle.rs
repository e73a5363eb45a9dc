use std::collections::BTreeMap;
use std::ops::Deref;

use chrono::{DateTime, TimeDelta, Utc};
use marketsync_types::CoverageReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InstrumentKey;

/// One OHLCV aggregate for a fixed period.
///
/// `low <= open, close <= high` is what venues are supposed to send; it is
/// not enforced here and consumers must tolerate violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Period boundary this candle opens at.
    pub period_start: DateTime<Utc>,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Traded volume, non-negative.
    pub volume: Decimal,
}

/// Candles strictly increasing by `period_start` with no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandleSeries(Vec<Candle>);

impl CandleSeries {
    /// An empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sort and de-duplicate arbitrary candles; on duplicate timestamps the
    /// last occurrence wins.
    #[must_use]
    pub fn from_unsorted(candles: impl IntoIterator<Item = Candle>) -> Self {
        let mut by_ts: BTreeMap<DateTime<Utc>, Candle> = BTreeMap::new();
        for c in candles {
            by_ts.insert(c.period_start, c);
        }
        Self::from_map(by_ts)
    }

    pub(crate) fn from_map(by_ts: BTreeMap<DateTime<Utc>, Candle>) -> Self {
        Self(by_ts.into_values().collect())
    }

    /// Consume the series and return the candles.
    #[must_use]
    pub fn into_inner(self) -> Vec<Candle> {
        self.0
    }
}

impl Deref for CandleSeries {
    type Target = [Candle];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of a historical candle backfill.
///
/// Callers that only read `series` never see transport noise; callers that
/// need completeness must inspect `coverage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleReport {
    /// Instrument the candles belong to.
    pub key: InstrumentKey,
    /// Candle period.
    pub period: TimeDelta,
    /// Merged, clipped series.
    pub series: CandleSeries,
    /// Windows that produced no data.
    pub coverage: CoverageReport,
}
