//! Historical candle reconciliation.
//!
//! - `split`: cut a requested range into windows sized to a venue's per-request limit
//! - `merge`: combine per-window results into one clipped, de-duplicated series
/// Range splitting into bounded fetch windows.
pub mod split;
/// Reconciliation of per-window candle results.
pub mod merge;
