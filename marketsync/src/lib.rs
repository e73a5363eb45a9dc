//! marketsync keeps locally cached market data consistent with remote trading venues.
//!
//! Overview
//! - Routes each request to the venue adapter named by the instrument key.
//! - Serves tickers and order books from a per-coordinator cache, fetching and
//!   normalizing on a miss; `refresh_*` forces a venue call.
//! - Backfills historical candles by splitting the requested range into windows
//!   that respect the venue's per-request limit, fetching them concurrently and
//!   merging the results into one de-duplicated, sorted, clipped series.
//!
//! Key behaviors and trade-offs
//! - Ticker and order book errors abort the single call; nothing partial is cached.
//! - Candle window failures never abort a backfill. They are reported in the
//!   returned `CoverageReport`, so callers that need completeness must check it.
//! - Candle collisions between windows follow `DedupPolicy` (latest window wins
//!   by default).
//! - A request deadline or caller cancellation keeps completed windows and
//!   reports the rest as `cancelled` gaps.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::{TimeDelta, Utc};
//! use marketsync::{InstrumentKey, SyncCoordinator};
//!
//! let coordinator = SyncCoordinator::builder()
//!     .with_adapter(Arc::new(MyVenue::new()))
//!     .max_concurrent_fetches(4)
//!     .build()?;
//!
//! let btc = InstrumentKey::spot("myvenue", "BTC", "USDT")?;
//! let ticker = coordinator.ticker(&btc).await?;
//!
//! let end = Utc::now();
//! let report = coordinator
//!     .historical_candles_extended(&btc, end - TimeDelta::days(30), end, TimeDelta::hours(1))
//!     .await?;
//! if !report.coverage.is_complete() {
//!     // decide whether to retry the gaps
//! }
//! ```
//!
//! See `marketsync/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use crate::core::{SyncCoordinator, SyncCoordinatorBuilder, tag_transport};

// Re-export core types for convenience
pub use marketsync_core::{
    // Trading
    Balance,
    // Market data
    Candle,
    CandleReport,
    CandleSeries,
    Capability,
    // Reconciliation
    CoverageGap,
    CoverageReport,
    DedupPolicy,
    FetchWindow,
    Fill,
    FillFeed,
    GapReason,
    InstrumentKey,
    MarketDataCache,
    MarketSegment,
    OrderAck,
    OrderBookLevel,
    OrderBookSnapshot,
    OrderKind,
    OrderRequest,
    OrderSide,
    // Configuration & errors
    SyncConfig,
    SyncError,
    TickerSnapshot,
    // Adapter contract
    VenueAdapter,
    VenueKey,
};
