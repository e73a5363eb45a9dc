use async_trait::async_trait;
use chrono::TimeDelta;

use crate::SyncError;
use crate::market::raw::{RawCandle, RawOrderBook, RawTicker};
use crate::market::trading::{Balance, OrderAck, OrderRequest};
use crate::market::{InstrumentKey, MarketSegment};
pub use marketsync_types::VenueKey;
use marketsync_types::FetchWindow;

/// Default per-request candle limit when an adapter does not advertise one.
pub const DEFAULT_MAX_CANDLES_PER_REQUEST: u32 = 5000;

/// Focused role trait for adapters that serve tickers.
#[async_trait]
pub trait TickerProvider: Send + Sync {
    /// Fetch the current ticker for one instrument.
    async fn fetch_ticker(&self, key: &InstrumentKey) -> Result<RawTicker, SyncError>;
}

/// Focused role trait for adapters that serve order books.
#[async_trait]
pub trait OrderBookProvider: Send + Sync {
    /// Fetch a full order book snapshot for one instrument.
    async fn fetch_order_book(&self, key: &InstrumentKey) -> Result<RawOrderBook, SyncError>;
}

/// Focused role trait for adapters that serve historical candles.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Fetch the candles of one bounded window.
    ///
    /// The window never spans more than [`max_candles_per_request`] periods.
    /// Venues may return candles outside the window, duplicates, or nothing;
    /// the coordinator reconciles all of that.
    ///
    /// [`max_candles_per_request`]: CandleProvider::max_candles_per_request
    async fn fetch_candle_window(
        &self,
        key: &InstrumentKey,
        window: FetchWindow,
        period: TimeDelta,
    ) -> Result<Vec<RawCandle>, SyncError>;

    /// REQUIRED: candle periods (in seconds) this venue can serve natively.
    fn supported_period_secs(&self) -> &'static [i64];

    /// Maximum number of candles the venue returns per request.
    fn max_candles_per_request(&self) -> u32 {
        DEFAULT_MAX_CANDLES_PER_REQUEST
    }

    /// Whether `period` is one of the supported periods.
    fn supports_period(&self, period: TimeDelta) -> bool {
        period.subsec_nanos() == 0 && self.supported_period_secs().contains(&period.num_seconds())
    }
}

/// Focused role trait for adapters that list tradable instruments.
#[async_trait]
pub trait InstrumentsProvider: Send + Sync {
    /// List the instruments tradable in a market segment.
    async fn tradable_instruments(
        &self,
        segment: MarketSegment,
    ) -> Result<Vec<InstrumentKey>, SyncError>;
}

/// Focused role trait for adapters that report account balances.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Fetch balances for a market segment.
    async fn holdings(&self, segment: MarketSegment) -> Result<Vec<Balance>, SyncError>;
}

/// Focused role trait for adapters that place and cancel orders.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    /// Submit an order. The request has already been validated.
    async fn submit_order(&self, req: &OrderRequest) -> Result<OrderAck, SyncError>;

    /// Cancel an order by venue id.
    async fn cancel_order(&self, key: &InstrumentKey, order_id: &str) -> Result<(), SyncError>;
}

/// Main trait implemented by venue adapters. Exposes capability discovery.
///
/// Every capability is optional; an adapter advertises the ones it implements
/// by returning `Some` from the matching accessor. Callers treat `None` as
/// [`SyncError::Unsupported`].
pub trait VenueAdapter: Send + Sync {
    /// Stable venue identifier; must match `InstrumentKey::venue()` of routed keys.
    fn name(&self) -> &'static str;

    /// Typed key constructed from the static name.
    fn key(&self) -> VenueKey {
        VenueKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this adapter serves the given market segment.
    ///
    /// Default: `false` for all segments. Adapters must opt in explicitly.
    fn supports_segment(&self, segment: MarketSegment) -> bool {
        let _ = segment;
        false
    }

    /// Advertise ticker capability.
    fn as_ticker_provider(&self) -> Option<&dyn TickerProvider> {
        None
    }

    /// Advertise order book capability.
    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        None
    }

    /// Advertise candle capability.
    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        None
    }

    /// If implemented, returns a trait object for instrument listing.
    fn as_instruments_provider(&self) -> Option<&dyn InstrumentsProvider> {
        None
    }
    /// If implemented, returns a trait object for account balances.
    fn as_account_provider(&self) -> Option<&dyn AccountProvider> {
        None
    }
    /// If implemented, returns a trait object for order entry.
    fn as_order_provider(&self) -> Option<&dyn OrderProvider> {
        None
    }
}
