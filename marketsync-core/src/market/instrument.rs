use core::fmt;

use marketsync_types::SyncError;
use serde::{Deserialize, Serialize};

/// Market segment an instrument trades in on its venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarketSegment {
    /// Spot exchange.
    Spot,
    /// Margin trading on spot pairs.
    Margin,
    /// Dated futures.
    Futures,
    /// Perpetual swaps.
    PerpetualSwap,
    /// Options.
    Options,
}

impl MarketSegment {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Margin => "margin",
            Self::Futures => "futures",
            Self::PerpetualSwap => "perpetual-swap",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one tradable pair on one venue and market segment.
///
/// Equality and hashing are exact on all four components; no case folding
/// or symbol canonicalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentKey {
    venue: String,
    base: String,
    quote: String,
    segment: MarketSegment,
}

impl InstrumentKey {
    /// Build a key from its components.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the venue or either currency is empty.
    pub fn new(
        venue: impl Into<String>,
        base: impl Into<String>,
        quote: impl Into<String>,
        segment: MarketSegment,
    ) -> Result<Self, SyncError> {
        let venue = venue.into();
        let base = base.into();
        let quote = quote.into();
        for (what, v) in [("venue", &venue), ("base currency", &base), ("quote currency", &quote)] {
            if v.trim().is_empty() {
                return Err(SyncError::InvalidArg(format!("{what} must not be empty")));
            }
        }
        Ok(Self {
            venue,
            base,
            quote,
            segment,
        })
    }

    /// Shorthand for a spot instrument.
    ///
    /// # Errors
    /// Same as [`InstrumentKey::new`].
    pub fn spot(
        venue: impl Into<String>,
        base: impl Into<String>,
        quote: impl Into<String>,
    ) -> Result<Self, SyncError> {
        Self::new(venue, base, quote, MarketSegment::Spot)
    }

    /// Venue (adapter) name.
    #[must_use]
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Base currency code.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote currency code.
    #[must_use]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Market segment.
    #[must_use]
    pub const fn segment(&self) -> MarketSegment {
        self.segment
    }

    /// `BASE/QUOTE` rendering of the pair.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}:{}",
            self.venue, self.base, self.quote, self.segment
        )
    }
}
