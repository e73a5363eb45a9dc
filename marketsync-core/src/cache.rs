//! Keyed, atomically replaced store for the latest ticker and order book per instrument.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::SyncError;
use crate::market::{InstrumentKey, OrderBookSnapshot, TickerSnapshot};

/// One cache entry. The slot lock is held only to read or swap the `Arc`,
/// so readers always observe a complete snapshot.
type Slot<V> = Arc<RwLock<Option<Arc<V>>>>;

struct KeyedStore<V> {
    slots: RwLock<HashMap<InstrumentKey, Slot<V>>>,
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> KeyedStore<V> {
    async fn existing_slot(&self, key: &InstrumentKey) -> Option<Slot<V>> {
        self.slots.read().await.get(key).cloned()
    }

    /// Look up the slot for `key`, creating it on first use. The map lock is
    /// released before the caller touches the slot.
    async fn slot(&self, key: &InstrumentKey) -> Slot<V> {
        if let Some(slot) = self.existing_slot(key).await {
            return slot;
        }
        let mut guard = self.slots.write().await;
        Arc::clone(guard.entry(key.clone()).or_default())
    }

    async fn get(&self, key: &InstrumentKey) -> Option<Arc<V>> {
        let slot = self.existing_slot(key).await?;
        let guard = slot.read().await;
        guard.clone()
    }

    async fn put(&self, key: &InstrumentKey, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let slot = self.slot(key).await;
        *slot.write().await = Some(Arc::clone(&value));
        value
    }

    /// Empty the slot under its own lock. The slot stays in the map so a
    /// writer that already holds it still publishes into the live entry.
    async fn remove(&self, key: &InstrumentKey) -> bool {
        let Some(slot) = self.existing_slot(key).await else {
            return false;
        };
        let mut guard = slot.write().await;
        guard.take().is_some()
    }

    async fn clear(&self) {
        for slot in self.all_slots().await {
            *slot.write().await = None;
        }
    }

    async fn all_slots(&self) -> Vec<Slot<V>> {
        self.slots.read().await.values().cloned().collect()
    }

    async fn len(&self) -> usize {
        let mut n = 0;
        for slot in self.all_slots().await {
            if slot.read().await.is_some() {
                n += 1;
            }
        }
        n
    }
}

/// Process-local store of the latest normalized ticker and order book per
/// [`InstrumentKey`].
///
/// Behavior:
/// - Many readers may read concurrently; a write swaps the whole entry under
///   an exclusive lock scoped to that one key, so unrelated instruments never
///   serialize on each other and no reader sees a torn snapshot.
/// - Entries never expire. When to refresh is the coordinator's decision.
/// - Order book writes are validated and sequence-checked; a rejected write
///   leaves the previous entry in place.
#[derive(Default)]
pub struct MarketDataCache {
    tickers: KeyedStore<TickerSnapshot>,
    books: KeyedStore<OrderBookSnapshot>,
}

impl MarketDataCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached ticker for `key`, if any.
    pub async fn ticker(&self, key: &InstrumentKey) -> Option<Arc<TickerSnapshot>> {
        self.tickers.get(key).await
    }

    /// Publish a ticker, replacing any previous one for the same instrument.
    /// Returns the published entry.
    pub async fn put_ticker(&self, snapshot: TickerSnapshot) -> Arc<TickerSnapshot> {
        let key = snapshot.key.clone();
        self.tickers.put(&key, snapshot).await
    }

    /// Cached order book for `key`, if any.
    pub async fn order_book(&self, key: &InstrumentKey) -> Option<Arc<OrderBookSnapshot>> {
        self.books.get(key).await
    }

    /// Validate and publish an order book. Returns the published entry.
    ///
    /// # Errors
    /// - `MalformedOrderBook` if [`OrderBookSnapshot::validate`] fails.
    /// - `StaleOrderBook` if the cached snapshot has a higher sequence.
    ///
    /// In both cases the previously cached snapshot (if any) is retained.
    pub async fn put_order_book(
        &self,
        snapshot: OrderBookSnapshot,
    ) -> Result<Arc<OrderBookSnapshot>, SyncError> {
        if let Err(e) = snapshot.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(instrument = %snapshot.key, error = %e, "rejected order book write");
            return Err(e);
        }
        let slot = self.books.slot(&snapshot.key).await;
        let mut guard = slot.write().await;
        if let Some(cached) = guard.as_ref()
            && snapshot.sequence < cached.sequence
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                instrument = %snapshot.key,
                cached = cached.sequence,
                incoming = snapshot.sequence,
                "rejected stale order book write"
            );
            return Err(SyncError::StaleOrderBook {
                cached: cached.sequence,
                incoming: snapshot.sequence,
            });
        }
        let snapshot = Arc::new(snapshot);
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop both cached views for `key`. Returns true if anything was cached.
    pub async fn invalidate(&self, key: &InstrumentKey) -> bool {
        let had_ticker = self.tickers.remove(key).await;
        let had_book = self.books.remove(key).await;
        had_ticker || had_book
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.tickers.clear().await;
        self.books.clear().await;
    }

    /// Number of cached `(tickers, order books)`.
    pub async fn len(&self) -> (usize, usize) {
        (self.tickers.len().await, self.books.len().await)
    }
}
