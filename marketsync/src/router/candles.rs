use core::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use marketsync_core::connector::CandleProvider;
use marketsync_core::{
    CandleReport, Capability, FetchWindow, InstrumentKey, SyncError, WindowOutcome,
    merge_windows, normalize_candles, split_range,
};

use crate::SyncCoordinator;
use crate::core::tag_transport;
use crate::router::util::{deadline_or_pending, settle_windows};

impl SyncCoordinator {
    /// Backfill historical candles for `[start, end)`.
    ///
    /// Behavior:
    /// - The range is split into windows of at most `max_per_request` periods
    ///   and each window is fetched independently, up to
    ///   `max_concurrent_fetches` at a time.
    /// - A failed or timed-out window does not abort the request; it shows up as
    ///   a gap in `coverage`. Even when every window fails, a report with an
    ///   empty series is returned.
    /// - The merged series is de-duplicated with the configured `DedupPolicy`,
    ///   sorted and clipped to `[start, end)`.
    ///
    /// # Errors
    /// Only request-level problems, all detected before any venue call:
    /// `InvalidRange` when `start > end`, `InvalidInterval` for a non-positive
    /// period, a zero limit or a period the venue does not serve,
    /// `UnknownVenue` and `Unsupported`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "marketsync::router",
            skip(self, key),
            fields(instrument = %key),
        )
    )]
    pub async fn historical_candles(
        &self,
        key: &InstrumentKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: TimeDelta,
        max_per_request: u32,
    ) -> Result<CandleReport, SyncError> {
        self.backfill(
            key,
            start,
            end,
            period,
            Some(max_per_request),
            std::future::pending::<()>(),
        )
        .await
    }

    /// Like [`historical_candles`](Self::historical_candles), using the
    /// adapter's advertised per-request limit.
    ///
    /// # Errors
    /// Same as [`historical_candles`](Self::historical_candles).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "marketsync::router",
            skip(self, key),
            fields(instrument = %key),
        )
    )]
    pub async fn historical_candles_extended(
        &self,
        key: &InstrumentKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: TimeDelta,
    ) -> Result<CandleReport, SyncError> {
        self.backfill(key, start, end, period, None, std::future::pending::<()>())
            .await
    }

    /// Like [`historical_candles`](Self::historical_candles), abandoning
    /// in-flight windows once `cancel` resolves.
    ///
    /// Windows that completed before cancellation are merged normally; every
    /// other window is reported as a `cancelled` gap.
    ///
    /// # Errors
    /// Same as [`historical_candles`](Self::historical_candles).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "marketsync::router",
            skip(self, key, cancel),
            fields(instrument = %key),
        )
    )]
    pub async fn historical_candles_with_cancel<C>(
        &self,
        key: &InstrumentKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: TimeDelta,
        max_per_request: u32,
        cancel: C,
    ) -> Result<CandleReport, SyncError>
    where
        C: Future<Output = ()>,
    {
        self.backfill(key, start, end, period, Some(max_per_request), cancel)
            .await
    }

    async fn backfill<C>(
        &self,
        key: &InstrumentKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: TimeDelta,
        max_per_request: Option<u32>,
        cancel: C,
    ) -> Result<CandleReport, SyncError>
    where
        C: Future<Output = ()>,
    {
        if start > end {
            return Err(SyncError::InvalidRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        let adapter = self.adapter_for(key)?;
        let provider = adapter
            .as_candle_provider()
            .ok_or_else(|| SyncError::unsupported(Capability::Candles.as_str()))?;
        let limit = max_per_request.unwrap_or_else(|| provider.max_candles_per_request());
        let windows = split_range(start, end, period, limit)?;
        if !provider.supports_period(period) {
            return Err(SyncError::InvalidInterval(format!(
                "{} does not serve {}s candles",
                adapter.name(),
                period.num_seconds()
            )));
        }

        let done = self
            .fetch_windows(adapter.name(), provider, key, &windows, period, cancel)
            .await;
        let (series, coverage) = merge_windows(
            settle_windows(&windows, done),
            start,
            end,
            self.cfg.dedup_policy,
        );

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                instrument = %key,
                windows = coverage.windows,
                candles = series.len(),
                "candle backfill merged"
            );
            if !coverage.is_complete() {
                tracing::warn!(
                    instrument = %key,
                    missing = coverage.gaps.len(),
                    windows = coverage.windows,
                    coverage = %coverage,
                    "candle backfill has coverage gaps"
                );
            }
        }

        Ok(CandleReport {
            key: key.clone(),
            period,
            series,
            coverage,
        })
    }

    /// Fetch every window, stopping early when `cancel` resolves or the
    /// request deadline passes. Returns only the outcomes that completed.
    async fn fetch_windows<C>(
        &self,
        venue: &'static str,
        provider: &dyn CandleProvider,
        key: &InstrumentKey,
        windows: &[FetchWindow],
        period: TimeDelta,
        cancel: C,
    ) -> Vec<(FetchWindow, WindowOutcome)>
    where
        C: Future<Output = ()>,
    {
        let capability = Capability::Candles.as_str();
        let call_timeout = self.cfg.provider_timeout;
        let mut pending = stream::iter(windows.iter().copied().map(move |w| async move {
            let res = Self::provider_call_with_timeout(
                venue,
                capability,
                call_timeout,
                provider.fetch_candle_window(key, w, period),
            )
            .await;
            let outcome = match res {
                Ok(raw) => WindowOutcome::Fetched(normalize_candles(&raw)),
                Err(e) => WindowOutcome::Failed(tag_transport(venue, &w.to_string(), e)),
            };
            (w, outcome)
        }))
        .buffer_unordered(self.cfg.max_concurrent_fetches);

        let deadline = deadline_or_pending(self.cfg.request_timeout);
        tokio::pin!(cancel);
        tokio::pin!(deadline);

        let mut done = Vec::with_capacity(windows.len());
        loop {
            tokio::select! {
                biased;
                () = &mut cancel => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(completed = done.len(), "candle backfill cancelled");
                    break;
                }
                () = &mut deadline => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(completed = done.len(), "candle backfill hit request deadline");
                    break;
                }
                next = pending.next() => match next {
                    Some(r) => done.push(r),
                    None => break,
                },
            }
        }
        done
    }
}
