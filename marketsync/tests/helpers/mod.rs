// Shared fixtures so tests can `use crate::helpers::*;`
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use marketsync::{InstrumentKey, MarketSegment, SyncCoordinator, VenueAdapter};
use marketsync_core::{RawCandle, RawLevel, RawOrderBook, RawTicker};

/// Venue name used by the default dynamic mock.
pub const VENUE: &str = "ddsx";

/// Spot key on the default venue.
pub fn key(base: &str) -> InstrumentKey {
    InstrumentKey::new(VENUE, base, "USDT", MarketSegment::Spot).expect("valid key")
}

/// Seconds since the epoch as a UTC timestamp.
pub fn ts(s: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(s, 0).expect("in range")
}

/// One-minute period; the smallest the dynamic mock serves above 15s.
pub fn minute() -> TimeDelta {
    TimeDelta::minutes(1)
}

/// Raw candle at `minute_idx` minutes with `close` as every price.
pub fn raw_candle(minute_idx: i64, close: f64) -> RawCandle {
    RawCandle {
        start_time: ts(minute_idx * 60),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1.0,
    }
}

/// A well-formed raw ticker closing at `close`.
pub fn raw_ticker(close: f64) -> RawTicker {
    RawTicker {
        high: close + 1.0,
        low: close - 1.0,
        bid: close - 0.5,
        ask: close + 0.5,
        open: close,
        close,
        observed_at: None,
    }
}

/// Raw book from `(price, qty)` pairs in venue order.
pub fn raw_book(bids: &[(f64, f64)], asks: &[(f64, f64)], sequence: i64) -> RawOrderBook {
    RawOrderBook {
        bids: bids.iter().map(|&(p, q)| RawLevel::new(p, q)).collect(),
        asks: asks.iter().map(|&(p, q)| RawLevel::new(p, q)).collect(),
        sequence,
    }
}

/// Coordinator over a single adapter with default configuration.
pub fn coordinator(adapter: Arc<dyn VenueAdapter>) -> SyncCoordinator {
    SyncCoordinator::builder()
        .with_adapter(adapter)
        .build()
        .expect("coordinator")
}
