use marketsync_core::{
    Balance, Capability, InstrumentKey, MarketSegment, OrderAck, OrderRequest, SyncError,
};

use crate::SyncCoordinator;
use crate::core::tag_transport;
use crate::router::macros::venue_router_method;

impl SyncCoordinator {
    /// Submit an order through the adapter serving `req.key`.
    ///
    /// The request is validated before any venue call.
    ///
    /// # Errors
    /// `InvalidArg` from validation, `UnknownVenue`, `Unsupported` when the
    /// adapter has no order entry, or the tagged adapter failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "marketsync::router",
            skip(self, req),
            fields(instrument = %req.key, side = ?req.side, kind = ?req.kind),
        )
    )]
    pub async fn submit_order(&self, req: &OrderRequest) -> Result<OrderAck, SyncError> {
        req.validate()?;
        let adapter = self.adapter_for(&req.key)?;
        let capability = Capability::SubmitOrder.as_str();
        let provider = adapter
            .as_order_provider()
            .ok_or_else(|| SyncError::unsupported(capability))?;
        Self::provider_call_with_timeout(
            adapter.name(),
            capability,
            self.cfg.provider_timeout,
            provider.submit_order(req),
        )
        .await
        .map_err(|e| tag_transport(adapter.name(), capability, e))
    }

    /// Cancel an order by venue id.
    ///
    /// # Errors
    /// `InvalidArg` for an empty id, otherwise as [`submit_order`](Self::submit_order).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "marketsync::router", skip(self, key), fields(instrument = %key))
    )]
    pub async fn cancel_order(&self, key: &InstrumentKey, order_id: &str) -> Result<(), SyncError> {
        if order_id.trim().is_empty() {
            return Err(SyncError::InvalidArg("order id must not be empty".into()));
        }
        let adapter = self.adapter_for(key)?;
        let capability = Capability::CancelOrder.as_str();
        let provider = adapter
            .as_order_provider()
            .ok_or_else(|| SyncError::unsupported(capability))?;
        Self::provider_call_with_timeout(
            adapter.name(),
            capability,
            self.cfg.provider_timeout,
            provider.cancel_order(key, order_id),
        )
        .await
        .map_err(|e| tag_transport(adapter.name(), capability, e))
    }

    venue_router_method! {
        /// Account balances held on `venue` for a market segment.
        method: holdings(segment: MarketSegment) -> Vec<Balance>,
        accessor: as_account_provider,
        capability: Capability::Holdings,
        call: holdings(segment)
    }

    venue_router_method! {
        /// Instruments tradable on `venue` in a market segment.
        method: tradable_instruments(segment: MarketSegment) -> Vec<InstrumentKey>,
        accessor: as_instruments_provider,
        capability: Capability::TradableInstruments,
        call: tradable_instruments(segment)
    }
}
