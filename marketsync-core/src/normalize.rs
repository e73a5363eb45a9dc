//! Conversion of raw venue payloads into the canonical market model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::SyncError;
use crate::market::raw::{RawCandle, RawLevel, RawOrderBook, RawTicker};
use crate::market::{Candle, InstrumentKey, OrderBookLevel, OrderBookSnapshot, TickerSnapshot};

/// Why a raw price could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejected {
    /// NaN, infinite or negative.
    Invalid,
    /// Finite and positive but too large or too small for `Decimal`.
    Unrepresentable,
}

/// Finite and non-negative, as a `Decimal`. Both zeros map to `Decimal::ZERO`.
fn non_negative(v: f64) -> Result<Decimal, Rejected> {
    if !v.is_finite() || v < 0.0 {
        return Err(Rejected::Invalid);
    }
    if v == 0.0 {
        return Ok(Decimal::ZERO);
    }
    match Decimal::from_f64(v) {
        Some(d) if !d.is_zero() => Ok(d),
        _ => Err(Rejected::Unrepresentable),
    }
}

/// Finite and strictly positive, as a `Decimal`.
fn positive(v: f64) -> Result<Decimal, Rejected> {
    non_negative(v).and_then(|d| if d.is_zero() { Err(Rejected::Invalid) } else { Ok(d) })
}

/// Normalize a raw ticker.
///
/// `observed_at` falls back to `now` when the venue sent no timestamp.
///
/// # Errors
/// Returns `MalformedTicker` naming the first field that is NaN, infinite,
/// negative or outside the range `Decimal` can represent.
pub fn normalize_ticker(
    key: &InstrumentKey,
    raw: &RawTicker,
    now: DateTime<Utc>,
) -> Result<TickerSnapshot, SyncError> {
    let field = |name: &str, v: f64| {
        non_negative(v).map_err(|r| {
            SyncError::MalformedTicker(match r {
                Rejected::Invalid => {
                    format!("{key}: {name} is not a finite non-negative price ({v})")
                }
                Rejected::Unrepresentable => {
                    format!("{key}: {name} is outside the representable decimal range ({v})")
                }
            })
        })
    };
    Ok(TickerSnapshot {
        key: key.clone(),
        high: field("high", raw.high)?,
        low: field("low", raw.low)?,
        bid: field("bid", raw.bid)?,
        ask: field("ask", raw.ask)?,
        open: field("open", raw.open)?,
        close: field("close", raw.close)?,
        observed_at: raw.observed_at.unwrap_or(now),
    })
}

/// Levels kept, plus counts of levels dropped as invalid and as unrepresentable.
fn normalize_levels(levels: &[RawLevel]) -> (Vec<OrderBookLevel>, usize, usize) {
    let mut out = Vec::with_capacity(levels.len());
    let (mut invalid, mut unrepresentable) = (0usize, 0usize);
    for l in levels {
        match (positive(l.price), positive(l.quantity)) {
            (Ok(price), Ok(quantity)) => out.push(OrderBookLevel { price, quantity }),
            (Err(Rejected::Invalid), _) | (_, Err(Rejected::Invalid)) => invalid += 1,
            _ => unrepresentable += 1,
        }
    }
    (out, invalid, unrepresentable)
}

/// Normalize a raw order book.
///
/// Levels with a non-finite or non-positive price or quantity are dropped, as
/// are levels whose values `Decimal` cannot represent.
/// Venue order is preserved; ordering and duplicate checks happen when the
/// snapshot is written to the cache (see [`OrderBookSnapshot::validate`]).
#[must_use]
pub fn normalize_order_book(
    key: &InstrumentKey,
    raw: &RawOrderBook,
    now: DateTime<Utc>,
) -> OrderBookSnapshot {
    let (bids, invalid_bids, unrepresentable_bids) = normalize_levels(&raw.bids);
    let (asks, invalid_asks, unrepresentable_asks) = normalize_levels(&raw.asks);
    if invalid_bids + invalid_asks > 0 {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            instrument = %key,
            dropped_bids = invalid_bids,
            dropped_asks = invalid_asks,
            "dropped invalid raw order book levels"
        );
    }
    if unrepresentable_bids + unrepresentable_asks > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            instrument = %key,
            dropped_bids = unrepresentable_bids,
            dropped_asks = unrepresentable_asks,
            "dropped order book levels outside the decimal range"
        );
    }
    OrderBookSnapshot {
        key: key.clone(),
        bids,
        asks,
        sequence: raw.sequence,
        observed_at: now,
    }
}

/// Normalize a raw candle batch.
///
/// Candles with any non-finite, negative or unrepresentable field are
/// dropped. Order and duplicates are left untouched for the merger.
#[must_use]
pub fn normalize_candles(raw: &[RawCandle]) -> Vec<Candle> {
    let out: Vec<Candle> = raw
        .iter()
        .filter_map(|r| {
            Some(Candle {
                period_start: r.start_time,
                open: non_negative(r.open).ok()?,
                high: non_negative(r.high).ok()?,
                low: non_negative(r.low).ok()?,
                close: non_negative(r.close).ok()?,
                volume: non_negative(r.volume).ok()?,
            })
        })
        .collect();
    if out.len() < raw.len() {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            dropped = raw.len() - out.len(),
            "dropped invalid raw candles"
        );
    }
    out
}
