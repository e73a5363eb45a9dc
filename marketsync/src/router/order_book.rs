use std::sync::Arc;

use chrono::Utc;
use marketsync_core::{
    Capability, InstrumentKey, OrderBookSnapshot, SyncError, normalize_order_book,
};

use crate::SyncCoordinator;
use crate::core::tag_transport;

impl SyncCoordinator {
    /// Current order book for one instrument, served from cache when present.
    ///
    /// Same cache-or-fetch shape as [`ticker`](Self::ticker). Raw levels are
    /// normalized and the snapshot is validated by the cache before publishing.
    ///
    /// # Errors
    /// `UnknownVenue`, `Unsupported`, a tagged transport failure,
    /// `MalformedOrderBook` or `StaleOrderBook`. A rejected snapshot is not
    /// published and there is no fallback.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "marketsync::router", skip(self, key), fields(instrument = %key))
    )]
    pub async fn order_book(
        &self,
        key: &InstrumentKey,
    ) -> Result<Arc<OrderBookSnapshot>, SyncError> {
        if let Some(hit) = self.cache.order_book(key).await {
            return Ok(hit);
        }
        self.refresh_order_book(key).await
    }

    /// Fetch a full order book from the venue and republish it.
    ///
    /// # Errors
    /// Same as [`order_book`](Self::order_book). On error the previous entry is kept.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "marketsync::router", skip(self, key), fields(instrument = %key))
    )]
    pub async fn refresh_order_book(
        &self,
        key: &InstrumentKey,
    ) -> Result<Arc<OrderBookSnapshot>, SyncError> {
        let adapter = self.adapter_for(key)?;
        let capability = Capability::OrderBook.as_str();
        let provider = adapter
            .as_order_book_provider()
            .ok_or_else(|| SyncError::unsupported(capability))?;
        let raw = Self::provider_call_with_timeout(
            adapter.name(),
            capability,
            self.cfg.provider_timeout,
            provider.fetch_order_book(key),
        )
        .await
        .map_err(|e| tag_transport(adapter.name(), &format!("order book {key}"), e))?;

        let snapshot = normalize_order_book(key, &raw, Utc::now());
        self.cache.put_order_book(snapshot).await
    }
}
