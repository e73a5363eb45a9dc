//! Venue payloads as returned by adapters, before normalization.
//!
//! Venues speak floats; conversion to `Decimal` and all validity checks
//! happen in [`crate::normalize`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw ticker fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTicker {
    /// Period high.
    pub high: f64,
    /// Period low.
    pub low: f64,
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Period open.
    pub open: f64,
    /// Last/close.
    pub close: f64,
    /// Venue timestamp, if the venue sent one.
    pub observed_at: Option<DateTime<Utc>>,
}

/// Raw order book level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLevel {
    /// Price.
    pub price: f64,
    /// Quantity.
    pub quantity: f64,
}

impl RawLevel {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }
}

/// Raw order book.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOrderBook {
    /// Bid levels in venue order.
    pub bids: Vec<RawLevel>,
    /// Ask levels in venue order.
    pub asks: Vec<RawLevel>,
    /// Venue last-update id.
    pub sequence: i64,
}

/// Raw candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    /// Period start.
    pub start_time: DateTime<Utc>,
    /// Open.
    pub open: f64,
    /// High.
    pub high: f64,
    /// Low.
    pub low: f64,
    /// Close.
    pub close: f64,
    /// Volume.
    pub volume: f64,
}
