//! marketsync-core
//!
//! Domain model, venue adapter traits and the pure building blocks of
//! market-data synchronization.
//!
//! - `market`: canonical instruments, tickers, order books, candles and trading types.
//! - `connector`: the `VenueAdapter` trait and its capability provider traits.
//! - `normalize`: conversion of raw venue payloads into the canonical model.
//! - `timeseries`: range splitting and per-window candle reconciliation.
//! - `cache`: the keyed ticker / order book store.
//! - `fills`: forwarding of trade executions.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `MarketDataCache` uses `tokio::sync::RwLock` and `FillFeed` uses a
//! `tokio::sync::mpsc` channel, so both must be driven from a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Keyed store for the latest ticker and order book per instrument.
pub mod cache;
/// Venue adapter capability traits and the primary `VenueAdapter` interface.
pub mod connector;
/// Trade execution forwarding.
pub mod fills;
/// Canonical market-data model.
pub mod market;
/// Raw-to-canonical conversion.
pub mod normalize;
/// Candle range splitting and reconciliation.
pub mod timeseries;

pub use cache::MarketDataCache;
pub use connector::{
    AccountProvider, CandleProvider, DEFAULT_MAX_CANDLES_PER_REQUEST, InstrumentsProvider,
    OrderBookProvider, OrderProvider, TickerProvider, VenueAdapter,
};
pub use fills::FillFeed;
pub use market::raw::{RawCandle, RawLevel, RawOrderBook, RawTicker};
pub use market::trading::{Balance, Fill, OrderAck, OrderKind, OrderRequest, OrderSide};
pub use market::{
    Candle, CandleReport, CandleSeries, InstrumentKey, MarketSegment, OrderBookLevel,
    OrderBookSnapshot, TickerSnapshot,
};
pub use normalize::{normalize_candles, normalize_order_book, normalize_ticker};
pub use timeseries::merge::{WindowOutcome, merge_windows};
pub use timeseries::split::split_range;

pub use marketsync_types::{
    Capability, CoverageGap, CoverageReport, DedupPolicy, FetchWindow, GapReason, SyncConfig,
    SyncError, VenueKey,
};
