use std::collections::HashSet;
#[cfg(feature = "tracing")]
use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use marketsync_core::{
    DedupPolicy, InstrumentKey, MarketDataCache, SyncConfig, SyncError, VenueAdapter,
};

/// Coordinator that keeps cached market data in sync with registered venues.
///
/// Owns its [`MarketDataCache`]; independent coordinators never share state.
pub struct SyncCoordinator {
    pub(crate) adapters: Vec<Arc<dyn VenueAdapter>>,
    pub(crate) cache: MarketDataCache,
    pub(crate) cfg: SyncConfig,
}

/// Builder for constructing a `SyncCoordinator` with custom configuration.
pub struct SyncCoordinatorBuilder {
    adapters: Vec<Arc<dyn VenueAdapter>>,
    cfg: SyncConfig,
}

impl Default for SyncCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCoordinatorBuilder {
    /// Create a new builder with default [`SyncConfig`].
    ///
    /// Starts with no adapters; register at least one via [`with_adapter`](Self::with_adapter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: vec![],
            cfg: SyncConfig::default(),
        }
    }

    /// Register a venue adapter.
    ///
    /// Requests are routed by `InstrumentKey::venue()`, which must equal the
    /// adapter's `name()`. Names must be unique.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn VenueAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SyncConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-call adapter timeout.
    ///
    /// Applies to every ticker, order book, trading call and to each candle
    /// window individually. A timed-out window becomes a `transport-error` gap.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for a candle backfill.
    ///
    /// Windows still in flight when it elapses are reported as `cancelled`
    /// gaps; completed windows are kept.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Bound the number of candle windows fetched concurrently. `1` fetches sequentially.
    #[must_use]
    pub const fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.cfg.max_concurrent_fetches = n;
        self
    }

    /// Select the tie-break for candles returned by more than one window.
    #[must_use]
    pub const fn dedup_policy(mut self, policy: DedupPolicy) -> Self {
        self.cfg.dedup_policy = policy;
        self
    }

    /// Build the coordinator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no adapters are registered, two adapters share a
    /// name, or `max_concurrent_fetches` is zero.
    pub fn build(self) -> Result<SyncCoordinator, SyncError> {
        if self.adapters.is_empty() {
            return Err(SyncError::InvalidArg(
                "no adapters registered; add at least one via with_adapter(...)".to_string(),
            ));
        }
        let mut seen: HashSet<&'static str> = HashSet::new();
        for a in &self.adapters {
            if !seen.insert(a.name()) {
                return Err(SyncError::InvalidArg(format!(
                    "adapter {} registered twice",
                    a.name()
                )));
            }
        }
        if self.cfg.max_concurrent_fetches == 0 {
            return Err(SyncError::InvalidArg(
                "max_concurrent_fetches must be at least 1".to_string(),
            ));
        }

        Ok(SyncCoordinator {
            adapters: self.adapters,
            cache: MarketDataCache::new(),
            cfg: self.cfg,
        })
    }
}

/// Attach venue and target context to an adapter failure.
///
/// Errors that already describe a venue-side condition pass through; anything
/// else is wrapped as `Transport`.
pub fn tag_transport(venue: &str, target: &str, e: SyncError) -> SyncError {
    match e {
        e @ (SyncError::Transport { .. }
        | SyncError::ProviderTimeout { .. }
        | SyncError::NotFound { .. }
        | SyncError::Unsupported { .. }) => e,
        other => SyncError::transport(venue, target, other.to_string()),
    }
}

impl SyncCoordinator {
    /// Start building a new `SyncCoordinator`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use marketsync::SyncCoordinator;
    ///
    /// let coordinator = SyncCoordinator::builder()
    ///     .with_adapter(Arc::new(MyVenue::new()))
    ///     .provider_timeout(Duration::from_secs(2))
    ///     .max_concurrent_fetches(8)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> SyncCoordinatorBuilder {
        SyncCoordinatorBuilder::new()
    }

    /// The coordinator's cache, e.g. to invalidate entries.
    #[must_use]
    pub const fn cache(&self) -> &MarketDataCache {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    /// Adapter registered under `venue`.
    pub(crate) fn adapter_named(&self, venue: &str) -> Result<&Arc<dyn VenueAdapter>, SyncError> {
        self.adapters
            .iter()
            .find(|a| a.name() == venue)
            .ok_or_else(|| SyncError::UnknownVenue(venue.to_string()))
    }

    /// Adapter responsible for `key`; it must serve the key's market segment.
    pub(crate) fn adapter_for(
        &self,
        key: &InstrumentKey,
    ) -> Result<&Arc<dyn VenueAdapter>, SyncError> {
        let adapter = self.adapter_named(key.venue())?;
        if !adapter.supports_segment(key.segment()) {
            return Err(SyncError::unsupported(format!(
                "{} segment on {}",
                key.segment(),
                adapter.name()
            )));
        }
        Ok(adapter)
    }

    /// Wrap an adapter future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "marketsync::core::provider_call_with_timeout",
            skip(fut),
            fields(
                venue = venue,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        venue: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SyncError>
    where
        Fut: core::future::Future<Output = Result<T, SyncError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(SyncError::provider_timeout(venue, capability)))
    }
}
