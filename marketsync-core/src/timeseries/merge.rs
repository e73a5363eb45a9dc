use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marketsync_types::{CoverageReport, DedupPolicy, FetchWindow, GapReason};

use crate::SyncError;
use crate::market::{Candle, CandleSeries};

/// What a single window fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    /// The fetch completed; candles are normalized but otherwise untouched.
    Fetched(Vec<Candle>),
    /// The fetch failed.
    Failed(SyncError),
    /// The fetch was abandoned before completing.
    Cancelled,
}

/// Merge per-window results into one series clipped to `[start, end)`.
///
/// - Results are processed in window order regardless of the order they
///   arrive in, so the output does not depend on fetch completion order.
/// - Duplicate `period_start` values are resolved by `policy`. Within one
///   window the last occurrence wins.
/// - Every window that failed, was cancelled, or returned nothing inside its
///   own span is recorded as a gap. A failed window never aborts the merge.
pub fn merge_windows<I>(
    results: I,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    policy: DedupPolicy,
) -> (CandleSeries, CoverageReport)
where
    I: IntoIterator<Item = (FetchWindow, WindowOutcome)>,
{
    let mut results: Vec<(FetchWindow, WindowOutcome)> = results.into_iter().collect();
    results.sort_by_key(|(w, _)| w.start);

    let mut report = CoverageReport::new(results.len());
    let mut by_ts: BTreeMap<DateTime<Utc>, Candle> = BTreeMap::new();

    for (window, outcome) in results {
        match outcome {
            WindowOutcome::Failed(e) => report.push(window, GapReason::TransportError, Some(e)),
            WindowOutcome::Cancelled => report.push(window, GapReason::Cancelled, None),
            WindowOutcome::Fetched(candles) => {
                if !candles.iter().any(|c| window.contains(c.period_start)) {
                    report.push(window, GapReason::EmptyResult, None);
                }
                // Within-window duplicates collapse to the last occurrence first.
                let mut local: BTreeMap<DateTime<Utc>, Candle> = BTreeMap::new();
                for c in candles {
                    if start <= c.period_start && c.period_start < end {
                        local.insert(c.period_start, c);
                    }
                }
                match policy {
                    DedupPolicy::LatestWindowWins => by_ts.extend(local),
                    DedupPolicy::EarliestWindowWins => {
                        for (ts, c) in local {
                            by_ts.entry(ts).or_insert(c);
                        }
                    }
                }
            }
        }
    }

    (CandleSeries::from_map(by_ts), report)
}
