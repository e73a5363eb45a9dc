//! Trading and account payloads for the optional non-market-data capabilities.

use chrono::{DateTime, Utc};
use marketsync_types::SyncError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InstrumentKey;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    /// Buy the base currency.
    Buy,
    /// Sell the base currency.
    Sell,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OrderKind {
    /// Execute at the best available price.
    Market,
    /// Rest at a limit price.
    Limit,
}

/// Order submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Instrument to trade.
    pub key: InstrumentKey,
    /// Side.
    pub side: OrderSide,
    /// Type.
    pub kind: OrderKind,
    /// Base-currency amount.
    pub amount: Decimal,
    /// Limit price; required for limit orders and rejected for market orders.
    pub price: Option<Decimal>,
    /// Optional client-assigned id.
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// Check the request shape before it is handed to a venue.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a non-positive amount, a missing or
    /// non-positive limit price, or a price on a market order.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.amount <= Decimal::ZERO {
            return Err(SyncError::InvalidArg("order amount must be positive".into()));
        }
        match (self.kind, self.price) {
            (OrderKind::Limit, None) => Err(SyncError::InvalidArg(
                "limit order requires a price".into(),
            )),
            (OrderKind::Limit, Some(p)) if p <= Decimal::ZERO => Err(SyncError::InvalidArg(
                "limit price must be positive".into(),
            )),
            (OrderKind::Market, Some(_)) => Err(SyncError::InvalidArg(
                "market order must not carry a price".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Venue acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Venue order id.
    pub order_id: String,
    /// Acceptance time.
    pub accepted_at: DateTime<Utc>,
}

/// Balance of one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code.
    pub currency: String,
    /// Total holdings.
    pub total: Decimal,
    /// Portion locked in open orders.
    pub hold: Decimal,
}

/// One execution reported by a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Execution time.
    pub timestamp: DateTime<Utc>,
    /// Instrument traded.
    pub key: InstrumentKey,
    /// Venue order id.
    pub order_id: String,
    /// Client order id, if one was assigned.
    pub client_order_id: Option<String>,
    /// Venue trade id.
    pub trade_id: String,
    /// Execution price.
    pub price: Decimal,
    /// Executed base amount.
    pub amount: Decimal,
}
