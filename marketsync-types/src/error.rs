use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the marketsync workspace.
///
/// Covers request validation, venue transport failures, normalization
/// invariant violations on tickers and order books, and capability absence.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncError {
    /// The requested range starts after it ends.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start, RFC 3339.
        start: String,
        /// Requested end, RFC 3339.
        end: String,
    },

    /// Non-positive candle period, zero per-request limit, or a period the venue does not serve.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// A venue call failed.
    #[error("{venue} transport failure for {target}: {msg}")]
    Transport {
        /// Venue (adapter) name.
        venue: String,
        /// What was being fetched, e.g. "ticker BTC/USDT spot" or a window span.
        target: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Normalized order book violates ordering or level invariants.
    #[error("malformed order book: {0}")]
    MalformedOrderBook(String),

    /// Raw ticker could not be normalized into finite, non-negative prices.
    #[error("malformed ticker: {0}")]
    MalformedTicker(String),

    /// An order book write carried an older sequence than the cached snapshot.
    #[error("stale order book: cached sequence {cached}, incoming {incoming}")]
    StaleOrderBook {
        /// Sequence of the snapshot currently cached.
        cached: i64,
        /// Sequence of the rejected snapshot.
        incoming: i64,
    },

    /// The requested capability is not implemented by the target adapter.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label, e.g. "order-book" or "submit-order".
        capability: String,
    },

    /// No adapter is registered for the venue named in the instrument key.
    #[error("no adapter registered for venue {0}")]
    UnknownVenue(String),

    /// An individual adapter call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {venue}")]
    ProviderTimeout {
        /// Venue (adapter) name that timed out.
        venue: String,
        /// Capability label that timed out.
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A resource could not be found on the venue.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource.
        what: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl SyncError {
    /// Helper: build an `Unsupported` error for a capability label.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Transport` error tagged with venue and target.
    pub fn transport(
        venue: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Transport {
            venue: venue.into(),
            target: target.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(venue: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            venue: venue.into(),
            capability: capability.into(),
        }
    }

    /// Returns true if the error originated from talking to the venue rather
    /// than from validating the request or the returned data.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ProviderTimeout { .. } | Self::NotFound { .. }
        )
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Capability absence is not actionable; everything else is.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }
}
