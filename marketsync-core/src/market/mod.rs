//! Canonical market-data model shared by adapters, cache and coordinator.

mod candle;
mod instrument;
mod order_book;
pub mod raw;
mod ticker;
pub mod trading;

pub use candle::{Candle, CandleReport, CandleSeries};
pub use instrument::{InstrumentKey, MarketSegment};
pub use order_book::{OrderBookLevel, OrderBookSnapshot};
pub use ticker::TickerSnapshot;
