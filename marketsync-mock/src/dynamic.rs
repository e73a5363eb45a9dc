use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use marketsync_core::connector::{
    AccountProvider, CandleProvider, InstrumentsProvider, OrderBookProvider, OrderProvider,
    TickerProvider, VenueAdapter,
};
use marketsync_core::{
    Balance, Capability, FetchWindow, InstrumentKey, MarketSegment, OrderAck, OrderRequest,
    RawCandle, RawOrderBook, RawTicker, SyncError,
};

/// Candle periods (seconds) the dynamic mock accepts unless overridden.
pub const DEFAULT_PERIOD_SECS: &[i64] = &[15, 60, 300, 900, 3600, 14_400, 86_400];

/// Instruction for how a method should behave for a given input.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Sleep, then return the provided value.
    Delayed(Duration, T),
    /// Fail immediately with the provided error.
    Fail(SyncError),
    /// Hang indefinitely (simulate a stalled venue).
    Hang,
}

impl<T> MockBehavior<T> {
    async fn run(self) -> Result<T, SyncError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Delayed(d, v) => {
                tokio::time::sleep(d).await;
                Ok(v)
            }
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// A scripted candle history served window by window.
#[derive(Clone)]
struct CandleHistory {
    candles: Vec<RawCandle>,
    repeat_boundary: bool,
}

impl CandleHistory {
    fn slice(&self, window: FetchWindow) -> Vec<RawCandle> {
        self.candles
            .iter()
            .filter(|c| {
                window.contains(c.start_time) || (self.repeat_boundary && c.start_time == window.end)
            })
            .copied()
            .collect()
    }
}

#[derive(Default)]
struct InternalState {
    ticker_rules: HashMap<InstrumentKey, MockBehavior<RawTicker>>,
    order_book_rules: HashMap<InstrumentKey, MockBehavior<RawOrderBook>>,
    candle_rules: HashMap<DateTime<Utc>, MockBehavior<Vec<RawCandle>>>,
    candle_history: Option<CandleHistory>,
    default_candles: Option<MockBehavior<Vec<RawCandle>>>,
    instruments: Option<MockBehavior<Vec<InstrumentKey>>>,
    holdings: Option<MockBehavior<Vec<Balance>>>,
    submit: Option<MockBehavior<OrderAck>>,
    cancel: Option<MockBehavior<()>>,
    calls: HashMap<Capability, usize>,
    candle_windows: Vec<FetchWindow>,
    submitted: Vec<OrderRequest>,
}

impl InternalState {
    fn record(&mut self, cap: Capability) {
        *self.calls.entry(cap).or_default() += 1;
    }

    fn candle_behavior(&self, window: FetchWindow) -> Option<MockBehavior<Vec<RawCandle>>> {
        if let Some(rule) = self.candle_rules.get(&window.start) {
            return Some(rule.clone());
        }
        if let Some(history) = &self.candle_history {
            return Some(MockBehavior::Return(history.slice(window)));
        }
        self.default_candles.clone()
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `fetch_ticker` calls for one instrument.
    pub async fn set_ticker_behavior(&self, key: InstrumentKey, behavior: MockBehavior<RawTicker>) {
        self.state.lock().await.ticker_rules.insert(key, behavior);
    }

    /// Set the behavior for `fetch_order_book` calls for one instrument.
    pub async fn set_order_book_behavior(
        &self,
        key: InstrumentKey,
        behavior: MockBehavior<RawOrderBook>,
    ) {
        self.state.lock().await.order_book_rules.insert(key, behavior);
    }

    /// Set the behavior for the candle window starting at `window_start`.
    ///
    /// Per-window rules take precedence over a served history and the default.
    pub async fn set_candle_behavior(
        &self,
        window_start: DateTime<Utc>,
        behavior: MockBehavior<Vec<RawCandle>>,
    ) {
        self.state
            .lock()
            .await
            .candle_rules
            .insert(window_start, behavior);
    }

    /// Behavior for candle windows without a specific rule and no served history.
    pub async fn set_default_candle_behavior(&self, behavior: MockBehavior<Vec<RawCandle>>) {
        self.state.lock().await.default_candles = Some(behavior);
    }

    /// Serve `candles` as the venue's full history: each window fetch returns
    /// the candles inside it. With `repeat_boundary`, the candle opening at the
    /// window's end is returned as well, as some venues do.
    pub async fn serve_candle_history(&self, candles: Vec<RawCandle>, repeat_boundary: bool) {
        self.state.lock().await.candle_history = Some(CandleHistory {
            candles,
            repeat_boundary,
        });
    }

    /// Set the behavior for `tradable_instruments`.
    pub async fn set_instruments_behavior(&self, behavior: MockBehavior<Vec<InstrumentKey>>) {
        self.state.lock().await.instruments = Some(behavior);
    }

    /// Set the behavior for `holdings`.
    pub async fn set_holdings_behavior(&self, behavior: MockBehavior<Vec<Balance>>) {
        self.state.lock().await.holdings = Some(behavior);
    }

    /// Set the behavior for `submit_order`.
    pub async fn set_submit_behavior(&self, behavior: MockBehavior<OrderAck>) {
        self.state.lock().await.submit = Some(behavior);
    }

    /// Set the behavior for `cancel_order`.
    pub async fn set_cancel_behavior(&self, behavior: MockBehavior<()>) {
        self.state.lock().await.cancel = Some(behavior);
    }

    /// Number of adapter calls made for a capability so far.
    pub async fn calls(&self, cap: Capability) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&cap)
            .copied()
            .unwrap_or_default()
    }

    /// Windows requested through `fetch_candle_window`, in call order.
    pub async fn candle_windows(&self) -> Vec<FetchWindow> {
        self.state.lock().await.candle_windows.clone()
    }

    /// Orders that reached the adapter, in call order.
    pub async fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.state.lock().await.submitted.clone()
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        *self.state.lock().await = InternalState::default();
    }
}

/// Builder for [`DynamicMockAdapter`].
pub struct DynamicMockBuilder {
    name: &'static str,
    capabilities: HashSet<Capability>,
    periods: &'static [i64],
    max_candles_per_request: u32,
}

impl DynamicMockBuilder {
    /// Restrict the advertised capabilities. All are advertised by default.
    #[must_use]
    pub fn capabilities(mut self, caps: &[Capability]) -> Self {
        self.capabilities = caps.iter().copied().collect();
        self
    }

    /// Candle periods (seconds) reported as supported.
    #[must_use]
    pub const fn supported_period_secs(mut self, periods: &'static [i64]) -> Self {
        self.periods = periods;
        self
    }

    /// Per-request candle limit reported to the coordinator.
    #[must_use]
    pub const fn max_candles_per_request(mut self, n: u32) -> Self {
        self.max_candles_per_request = n;
        self
    }

    /// Build the adapter and its controller.
    #[must_use]
    pub fn build(self) -> (Arc<dyn VenueAdapter>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(DynamicMockAdapter {
            name: self.name,
            capabilities: self.capabilities,
            periods: self.periods,
            max_candles_per_request: self.max_candles_per_request,
            state,
        });
        (me as Arc<dyn VenueAdapter>, controller)
    }
}

/// An adapter that defers all behavior to an external controller.
pub struct DynamicMockAdapter {
    name: &'static str,
    capabilities: HashSet<Capability>,
    periods: &'static [i64],
    max_candles_per_request: u32,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockAdapter {
    /// Start configuring a dynamic mock named `name`.
    #[must_use]
    pub fn builder(name: &'static str) -> DynamicMockBuilder {
        DynamicMockBuilder {
            name,
            capabilities: [
                Capability::Ticker,
                Capability::OrderBook,
                Capability::Candles,
                Capability::TradableInstruments,
                Capability::Holdings,
                Capability::SubmitOrder,
                Capability::CancelOrder,
            ]
            .into_iter()
            .collect(),
            periods: DEFAULT_PERIOD_SECS,
            max_candles_per_request: marketsync_core::DEFAULT_MAX_CANDLES_PER_REQUEST,
        }
    }

    /// Create a new dynamic mock adapter with every capability, and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn VenueAdapter>, DynamicMockController) {
        Self::builder(name).build()
    }

    fn has(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// Record the call and take a behavior snapshot without holding the lock
    /// across the behavior's await points.
    async fn take<T>(
        &self,
        cap: Capability,
        pick: impl FnOnce(&mut InternalState) -> Option<MockBehavior<T>>,
    ) -> Result<T, SyncError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.record(cap);
            pick(&mut guard)
        };
        match behavior {
            Some(b) => b.run().await,
            None => Err(SyncError::not_found(format!(
                "{}: no scripted {cap} response",
                self.name
            ))),
        }
    }
}

impl VenueAdapter for DynamicMockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn supports_segment(&self, _segment: MarketSegment) -> bool {
        true
    }

    fn as_ticker_provider(&self) -> Option<&dyn TickerProvider> {
        self.has(Capability::Ticker)
            .then_some(self as &dyn TickerProvider)
    }

    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        self.has(Capability::OrderBook)
            .then_some(self as &dyn OrderBookProvider)
    }

    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        self.has(Capability::Candles)
            .then_some(self as &dyn CandleProvider)
    }

    fn as_instruments_provider(&self) -> Option<&dyn InstrumentsProvider> {
        self.has(Capability::TradableInstruments)
            .then_some(self as &dyn InstrumentsProvider)
    }

    fn as_account_provider(&self) -> Option<&dyn AccountProvider> {
        self.has(Capability::Holdings)
            .then_some(self as &dyn AccountProvider)
    }

    fn as_order_provider(&self) -> Option<&dyn OrderProvider> {
        (self.has(Capability::SubmitOrder) || self.has(Capability::CancelOrder))
            .then_some(self as &dyn OrderProvider)
    }
}

#[async_trait]
impl TickerProvider for DynamicMockAdapter {
    async fn fetch_ticker(&self, key: &InstrumentKey) -> Result<RawTicker, SyncError> {
        self.take(Capability::Ticker, |s| s.ticker_rules.get(key).cloned())
            .await
    }
}

#[async_trait]
impl OrderBookProvider for DynamicMockAdapter {
    async fn fetch_order_book(&self, key: &InstrumentKey) -> Result<RawOrderBook, SyncError> {
        self.take(Capability::OrderBook, |s| {
            s.order_book_rules.get(key).cloned()
        })
        .await
    }
}

#[async_trait]
impl CandleProvider for DynamicMockAdapter {
    async fn fetch_candle_window(
        &self,
        _key: &InstrumentKey,
        window: FetchWindow,
        _period: TimeDelta,
    ) -> Result<Vec<RawCandle>, SyncError> {
        self.take(Capability::Candles, |s| {
            s.candle_windows.push(window);
            s.candle_behavior(window)
        })
        .await
    }

    fn supported_period_secs(&self) -> &'static [i64] {
        self.periods
    }

    fn max_candles_per_request(&self) -> u32 {
        self.max_candles_per_request
    }
}

#[async_trait]
impl InstrumentsProvider for DynamicMockAdapter {
    async fn tradable_instruments(
        &self,
        _segment: MarketSegment,
    ) -> Result<Vec<InstrumentKey>, SyncError> {
        self.take(Capability::TradableInstruments, |s| s.instruments.clone())
            .await
    }
}

#[async_trait]
impl AccountProvider for DynamicMockAdapter {
    async fn holdings(&self, _segment: MarketSegment) -> Result<Vec<Balance>, SyncError> {
        self.take(Capability::Holdings, |s| s.holdings.clone()).await
    }
}

#[async_trait]
impl OrderProvider for DynamicMockAdapter {
    async fn submit_order(&self, req: &OrderRequest) -> Result<OrderAck, SyncError> {
        if !self.has(Capability::SubmitOrder) {
            return Err(SyncError::unsupported(Capability::SubmitOrder.as_str()));
        }
        self.take(Capability::SubmitOrder, |s| {
            s.submitted.push(req.clone());
            s.submit.clone()
        })
        .await
    }

    async fn cancel_order(&self, _key: &InstrumentKey, _order_id: &str) -> Result<(), SyncError> {
        if !self.has(Capability::CancelOrder) {
            return Err(SyncError::unsupported(Capability::CancelOrder.as_str()));
        }
        self.take(Capability::CancelOrder, |s| s.cancel.clone()).await
    }
}
