use chrono::{DateTime, TimeDelta, Utc};
use marketsync_types::FetchWindow;

use crate::SyncError;

/// Split `[start, end)` into contiguous windows of at most `max_per_request`
/// periods each.
///
/// Windows are returned in order, never overlap, and their union is exactly
/// `[start, end)`. The last window is truncated to `end`. `start == end`
/// yields no windows.
///
/// # Errors
/// - `InvalidRange` when `start > end`.
/// - `InvalidInterval` when `period` is not positive, `max_per_request` is zero,
///   or the resulting window span overflows.
pub fn split_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: TimeDelta,
    max_per_request: u32,
) -> Result<Vec<FetchWindow>, SyncError> {
    if start > end {
        return Err(SyncError::InvalidRange {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }
    if period <= TimeDelta::zero() {
        return Err(SyncError::InvalidInterval(format!(
            "period must be positive, got {period}"
        )));
    }
    if max_per_request == 0 {
        return Err(SyncError::InvalidInterval(
            "max candles per request must be positive".into(),
        ));
    }
    let span = i32::try_from(max_per_request)
        .ok()
        .and_then(|n| period.checked_mul(n))
        .ok_or_else(|| {
            SyncError::InvalidInterval(format!(
                "window span overflows: {period} x {max_per_request}"
            ))
        })?;

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let next = cursor
            .checked_add_signed(span)
            .map_or(end, |n| n.min(end));
        windows.push(FetchWindow::new(cursor, next));
        cursor = next;
    }
    Ok(windows)
}
