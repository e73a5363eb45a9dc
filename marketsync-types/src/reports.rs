//! Coverage reports produced by candle reconciliation.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::window::FetchWindow;

/// Why a fetch window contributed no usable candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum GapReason {
    /// The window's fetch failed.
    TransportError,
    /// The fetch succeeded but returned nothing inside the window.
    EmptyResult,
    /// The fetch was abandoned before it completed.
    Cancelled,
}

impl GapReason {
    /// Stable, kebab-case identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransportError => "transport-error",
            Self::EmptyResult => "empty-result",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One window for which no usable candle data was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// The window that produced no data.
    pub window: FetchWindow,
    /// Classification of the gap.
    pub reason: GapReason,
    /// Underlying failure for `TransportError` gaps.
    pub error: Option<SyncError>,
}

/// Summary of which fetch windows of a candle request produced data.
///
/// Gaps are kept in window order. An empty gap list means every window
/// returned at least one candle inside its own span.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Number of windows the request was split into.
    pub windows: usize,
    /// Windows that produced no usable data.
    pub gaps: Vec<CoverageGap>,
}

impl CoverageReport {
    /// Create an empty report for `windows` planned windows.
    #[must_use]
    pub const fn new(windows: usize) -> Self {
        Self {
            windows,
            gaps: Vec::new(),
        }
    }

    /// Record a gap.
    pub fn push(&mut self, window: FetchWindow, reason: GapReason, error: Option<SyncError>) {
        self.gaps.push(CoverageGap {
            window,
            reason,
            error,
        });
    }

    /// True when no window is missing data.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Number of windows that produced data.
    #[must_use]
    pub fn covered(&self) -> usize {
        self.windows.saturating_sub(self.gaps.len())
    }

    /// Gaps with the given reason.
    pub fn gaps_with(&self, reason: GapReason) -> impl Iterator<Item = &CoverageGap> {
        self.gaps.iter().filter(move |g| g.reason == reason)
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} windows covered", self.covered(), self.windows)?;
        for g in &self.gaps {
            write!(f, "; {} {}", g.window, g.reason)?;
        }
        Ok(())
    }
}
