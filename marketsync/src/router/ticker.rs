use std::sync::Arc;

use chrono::Utc;
use marketsync_core::{Capability, InstrumentKey, SyncError, TickerSnapshot, normalize_ticker};

use crate::SyncCoordinator;
use crate::core::tag_transport;

impl SyncCoordinator {
    /// Current ticker for one instrument, served from cache when present.
    ///
    /// Behavior:
    /// - Cache hit: returned as-is, without contacting the venue. Freshness is
    ///   the caller's concern; use [`refresh_ticker`](Self::refresh_ticker) to force an update.
    /// - Cache miss: one adapter call, normalization, publish, return.
    ///
    /// # Errors
    /// `UnknownVenue`, `Unsupported`, a tagged transport failure or
    /// `MalformedTicker`. Nothing is cached on error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "marketsync::router", skip(self, key), fields(instrument = %key))
    )]
    pub async fn ticker(&self, key: &InstrumentKey) -> Result<Arc<TickerSnapshot>, SyncError> {
        if let Some(hit) = self.cache.ticker(key).await {
            return Ok(hit);
        }
        self.refresh_ticker(key).await
    }

    /// Fetch the ticker from the venue and republish it, ignoring any cached entry.
    ///
    /// # Errors
    /// Same as [`ticker`](Self::ticker). On error the previous entry is kept.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "marketsync::router", skip(self, key), fields(instrument = %key))
    )]
    pub async fn refresh_ticker(
        &self,
        key: &InstrumentKey,
    ) -> Result<Arc<TickerSnapshot>, SyncError> {
        let adapter = self.adapter_for(key)?;
        let capability = Capability::Ticker.as_str();
        let provider = adapter
            .as_ticker_provider()
            .ok_or_else(|| SyncError::unsupported(capability))?;
        let raw = Self::provider_call_with_timeout(
            adapter.name(),
            capability,
            self.cfg.provider_timeout,
            provider.fetch_ticker(key),
        )
        .await
        .map_err(|e| tag_transport(adapter.name(), &format!("ticker {key}"), e))?;

        let snapshot = normalize_ticker(key, &raw, Utc::now())?;
        Ok(self.cache.put_ticker(snapshot).await)
    }
}
