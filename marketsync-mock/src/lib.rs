//! Mock venue adapters for marketsync tests and examples.
//!
//! - [`MockVenue`]: deterministic market data generated from the request, no setup needed.
//! - [`DynamicMockAdapter`]: every response scripted through a [`DynamicMockController`].
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use marketsync_core::connector::{CandleProvider, OrderBookProvider, TickerProvider, VenueAdapter};
use marketsync_core::{
    FetchWindow, InstrumentKey, MarketSegment, RawCandle, RawLevel, RawOrderBook, RawTicker,
    SyncError,
};

mod dynamic;

pub use dynamic::{
    DEFAULT_PERIOD_SECS, DynamicMockAdapter, DynamicMockBuilder, DynamicMockController,
    MockBehavior,
};

/// Mock adapter for CI-safe examples. Prices are derived from the base
/// currency so every run sees the same data.
///
/// A base currency of `FAIL` makes every call fail with a transport error.
pub struct MockVenue {
    sequence: AtomicI64,
}

impl Default for MockVenue {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVenue {
    /// Venue name used in instrument keys routed to this adapter.
    pub const NAME: &'static str = "mock";

    /// Create the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sequence: AtomicI64::new(0),
        }
    }

    fn check(key: &InstrumentKey, target: &str) -> Result<(), SyncError> {
        if key.base() == "FAIL" {
            return Err(SyncError::transport(
                Self::NAME,
                target.to_string(),
                format!("forced failure for {}", key.pair()),
            ));
        }
        Ok(())
    }

    fn reference_price(key: &InstrumentKey) -> f64 {
        let seed: u32 = key.base().bytes().map(u32::from).sum();
        f64::from(seed % 997 + 3) * 10.0
    }
}

impl VenueAdapter for MockVenue {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn supports_segment(&self, segment: MarketSegment) -> bool {
        matches!(segment, MarketSegment::Spot)
    }

    fn as_ticker_provider(&self) -> Option<&dyn TickerProvider> {
        Some(self as &dyn TickerProvider)
    }

    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        Some(self as &dyn OrderBookProvider)
    }

    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        Some(self as &dyn CandleProvider)
    }
}

#[async_trait]
impl TickerProvider for MockVenue {
    async fn fetch_ticker(&self, key: &InstrumentKey) -> Result<RawTicker, SyncError> {
        Self::check(key, "ticker")?;
        let px = Self::reference_price(key);
        Ok(RawTicker {
            high: px * 1.02,
            low: px * 0.98,
            bid: px - 0.5,
            ask: px + 0.5,
            open: px * 0.99,
            close: px,
            observed_at: None,
        })
    }
}

#[async_trait]
impl OrderBookProvider for MockVenue {
    async fn fetch_order_book(&self, key: &InstrumentKey) -> Result<RawOrderBook, SyncError> {
        Self::check(key, "order-book")?;
        let px = Self::reference_price(key);
        let bids = (1..=5)
            .map(|i| RawLevel::new(px - f64::from(i), f64::from(i)))
            .collect();
        let asks = (1..=5)
            .map(|i| RawLevel::new(px + f64::from(i), f64::from(i)))
            .collect();
        Ok(RawOrderBook {
            bids,
            asks,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
        })
    }
}

#[async_trait]
impl CandleProvider for MockVenue {
    async fn fetch_candle_window(
        &self,
        key: &InstrumentKey,
        window: FetchWindow,
        period: TimeDelta,
    ) -> Result<Vec<RawCandle>, SyncError> {
        Self::check(key, "candles")?;
        let step = period.num_seconds();
        if step <= 0 {
            return Err(SyncError::InvalidInterval(format!("{period}")));
        }
        let px = Self::reference_price(key);
        let first = window.start.timestamp().div_euclid(step) * step;
        let mut out = Vec::new();
        let mut t = if first < window.start.timestamp() {
            first + step
        } else {
            first
        };
        while t < window.end.timestamp() {
            let Some(start_time) = DateTime::<Utc>::from_timestamp(t, 0) else {
                break;
            };
            #[allow(clippy::cast_precision_loss)]
            let drift = (t / step).rem_euclid(50) as f64 * 0.1;
            out.push(RawCandle {
                start_time,
                open: px + drift,
                high: px + drift + 1.0,
                low: px + drift - 1.0,
                close: px + drift + 0.5,
                volume: 100.0 + drift,
            });
            t += step;
        }
        Ok(out)
    }

    fn supported_period_secs(&self) -> &'static [i64] {
        DEFAULT_PERIOD_SECS
    }

    fn max_candles_per_request(&self) -> u32 {
        500
    }
}
