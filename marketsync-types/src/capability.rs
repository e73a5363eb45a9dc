use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for routing, errors, and telemetry.
///
/// These map one-to-one with coordinator operations and adapter role traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Best bid/ask ticker for one instrument.
    Ticker,
    /// Full order book snapshot for one instrument.
    OrderBook,
    /// One bounded window of historical candles.
    Candles,

    /// Listing of tradable instruments for a market segment.
    TradableInstruments,
    /// Account balances.
    Holdings,
    /// Order submission.
    SubmitOrder,
    /// Order cancellation.
    CancelOrder,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::OrderBook => "order-book",
            Self::Candles => "candles",
            Self::TradableInstruments => "tradable-instruments",
            Self::Holdings => "holdings",
            Self::SubmitOrder => "submit-order",
            Self::CancelOrder => "cancel-order",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
