use chrono::{DateTime, Utc};
use marketsync_types::SyncError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InstrumentKey;

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price, strictly positive.
    pub price: Decimal,
    /// Resting quantity, strictly positive.
    pub quantity: Decimal,
}

/// Full order book snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Instrument the book belongs to.
    pub key: InstrumentKey,
    /// Bid levels, best (highest) first.
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, best (lowest) first.
    pub asks: Vec<OrderBookLevel>,
    /// Venue sequence number; non-decreasing per instrument.
    pub sequence: i64,
    /// When the snapshot was observed.
    pub observed_at: DateTime<Utc>,
}

impl OrderBookSnapshot {
    /// Highest bid, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Lowest ask, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Check the book invariants.
    ///
    /// - every level has `price > 0` and `quantity > 0`
    /// - bids are strictly descending by price, asks strictly ascending
    ///   (which also rules out a price appearing twice on one side)
    ///
    /// # Errors
    /// Returns `MalformedOrderBook` describing the first violation found.
    pub fn validate(&self) -> Result<(), SyncError> {
        check_side(&self.bids, "bid", |prev, next| prev > next)?;
        check_side(&self.asks, "ask", |prev, next| prev < next)?;
        Ok(())
    }
}

fn check_side(
    levels: &[OrderBookLevel],
    side: &str,
    ordered: impl Fn(Decimal, Decimal) -> bool,
) -> Result<(), SyncError> {
    for (i, level) in levels.iter().enumerate() {
        if level.price <= Decimal::ZERO || level.quantity <= Decimal::ZERO {
            return Err(SyncError::MalformedOrderBook(format!(
                "{side} level {i} has non-positive price or quantity ({} @ {})",
                level.quantity, level.price
            )));
        }
    }
    for (i, pair) in levels.windows(2).enumerate() {
        let (prev, next) = (pair[0].price, pair[1].price);
        if prev == next {
            return Err(SyncError::MalformedOrderBook(format!(
                "duplicate {side} price {next} at level {}",
                i + 1
            )));
        }
        if !ordered(prev, next) {
            return Err(SyncError::MalformedOrderBook(format!(
                "{side} levels out of order at level {}: {prev} then {next}",
                i + 1
            )));
        }
    }
    Ok(())
}
